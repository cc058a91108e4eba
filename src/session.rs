use crate::{Product, Storage, Store};
use anyhow::{bail, Result};
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use std::str::FromStr;

// The title line ends with two spaces.
const BANNER: &str = concat!(
    "========================================\n",
    "   SKLEP ODZIEŻOWY - PANEL ZARZĄDZANIA  \n",
    "========================================",
);

const MENU: &str = "\
1. [Lista]   Przeglądaj asortyment
2. [Dodaj]   Wprowadź nowy produkt
3. [Edytuj]  Zmień dane produktu
4. [Usuń]    Wykreśl produkt z bazy
5. [Wyjście] Zamknij program";

// An entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Choice {
    List,
    Add,
    Edit,
    Delete,
    Exit,
}

impl FromStr for Choice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::prelude::v1::Result<Self, Self::Err> {
        Ok(match s {
            "1" => Self::List,
            "2" => Self::Add,
            "3" => Self::Edit,
            "4" => Self::Delete,
            "5" => Self::Exit,
            _ => bail!("Unknown menu choice: {s:?}"),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum State {
    Running,
    Stopped,
}

// Session runs the text menu over a store until the user picks "exit" or
// the input ends.
// Invalid numbers abandon the current action and return to the menu.
pub struct Session<'a, S: Storage, R, W> {
    store: &'a mut Store<S>,
    input: R,
    output: W,
}

impl<'a, S: Storage, R: BufRead, W: Write> Session<'a, S, R, W> {
    pub fn new(store: &'a mut Store<S>, input: R, output: W) -> Self {
        Self {
            store,
            input,
            output,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut state = State::Running;
        while state == State::Running {
            writeln!(self.output, "{BANNER}")?;
            writeln!(self.output, "{MENU}")?;
            state = match self.prompt("\nWybierz opcję: ")? {
                Some(choice) => self.dispatch(&choice)?,
                None => State::Stopped,
            };
        }
        log::debug!("Session stopped");
        Ok(())
    }

    fn dispatch(&mut self, choice: &str) -> Result<State> {
        match choice.parse::<Choice>() {
            Ok(Choice::List) => self.list(),
            Ok(Choice::Add) => self.add(),
            Ok(Choice::Edit) => self.edit(),
            Ok(Choice::Delete) => self.delete(),
            Ok(Choice::Exit) => Ok(State::Stopped),
            Err(e) => {
                log::debug!("{e}");
                self.say("Niepoprawny wybór.")
            }
        }
    }

    fn list(&mut self) -> Result<State> {
        let products = self.store.list();
        if products.is_empty() {
            writeln!(self.output, "Lista jest pusta.")?;
        }
        for Product {
            id,
            name,
            size,
            price,
        } in products
        {
            writeln!(
                self.output,
                "ID: {id} | {name} | Rozmiar: {size} | Cena: {price} zł"
            )?;
        }
        Ok(State::Running)
    }

    fn add(&mut self) -> Result<State> {
        let Some(name) = self.prompt("Nazwa: ")? else {
            return Ok(State::Stopped);
        };
        let Some(size) = self.prompt("Rozmiar: ")? else {
            return Ok(State::Stopped);
        };
        let Some(price) = self.prompt("Cena: ")? else {
            return Ok(State::Stopped);
        };
        let Some(price) = parse_price(&price) else {
            return self.say("Błędna cena!");
        };
        self.store.add(name, size, price)?;
        self.say("Dodano produkt.")
    }

    fn edit(&mut self) -> Result<State> {
        let Some(id) = self.prompt("Podaj ID produktu do edycji: ")? else {
            return Ok(State::Stopped);
        };
        let Some(id) = parse_id(&id) else {
            return self.say("Błędne ID!");
        };
        let Some(name) = self.prompt("Nowa nazwa: ")? else {
            return Ok(State::Stopped);
        };
        let Some(size) = self.prompt("Nowy rozmiar: ")? else {
            return Ok(State::Stopped);
        };
        let Some(price) = self.prompt("Nowa cena: ")? else {
            return Ok(State::Stopped);
        };
        let Some(price) = parse_price(&price) else {
            return self.say("Błędny format ceny!");
        };
        if self.store.update(id, name, size, price)?.is_some() {
            self.say("Produkt został zaktualizowany.")
        } else {
            self.say("Nie znaleziono produktu o podanym ID.")
        }
    }

    fn delete(&mut self) -> Result<State> {
        let Some(id) = self.prompt("Podaj ID do usunięcia: ")? else {
            return Ok(State::Stopped);
        };
        let Some(id) = parse_id(&id) else {
            return self.say("Błędny format ID!");
        };
        if self.store.delete(id)?.is_some() {
            self.say("Usunięto produkt.")
        } else {
            self.say("Nie znaleziono produktu o tym ID.")
        }
    }

    // Print a one line message and keep running.
    fn say(&mut self, msg: &str) -> Result<State> {
        writeln!(self.output, "{msg}")?;
        Ok(State::Running)
    }

    // Print `label` and read one line of input, without the line ending.
    // Returns None once the input is exhausted.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        let len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(len);
        log::trace!("Read {line:?}");
        Ok(Some(line))
    }
}

fn parse_id(s: &str) -> Option<i32> {
    s.trim().parse().ok()
}

fn parse_price(s: &str) -> Option<Decimal> {
    s.trim().parse().ok()
}

#[test]
fn test_parse_choice() {
    let parse = |s: &str| s.parse::<Choice>();
    assert_eq!(parse("1").unwrap(), Choice::List);
    assert_eq!(parse("3").unwrap(), Choice::Edit);
    assert_eq!(parse("5").unwrap(), Choice::Exit);
    assert!(parse("").is_err());
    assert!(parse(" 1 ").is_err());
    assert!(parse("1 ").is_err());
    assert!(parse("6").is_err());
    assert!(parse("lista").is_err());
}

#[test]
fn test_parse_numbers() {
    assert_eq!(parse_id(" 12 "), Some(12));
    assert_eq!(parse_id("abc"), None);
    assert_eq!(parse_id("-1"), Some(-1));
    assert_eq!(parse_id("0"), Some(0));
    assert_eq!(parse_id("1.5"), None);
    assert_eq!(parse_price("49.99"), Some(Decimal::new(4999, 2)));
    assert_eq!(parse_price("89.50").unwrap().to_string(), "89.50");
    assert_eq!(parse_price("tanio"), None);
    assert_eq!(parse_price(""), None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;
    use pretty_assertions::assert_eq;

    fn menu() -> String {
        format!("{BANNER}\n{MENU}\n\nWybierz opcję: ")
    }

    // Run a session over `input` and return everything it printed.
    fn run(store: &mut Store<MemoryStorage>, input: &str) -> String {
        let _ = env_logger::try_init();
        let mut out = Vec::new();
        Session::new(store, input.as_bytes(), &mut out)
            .run()
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn store(contents: &str) -> Store<MemoryStorage> {
        Store::open(MemoryStorage::with_contents(contents)).unwrap()
    }

    #[test]
    fn test_exit() {
        let mut store = store("");
        assert_eq!(run(&mut store, "5\n"), menu());
    }

    #[test]
    fn test_end_of_input() {
        let mut store = store("");
        assert_eq!(run(&mut store, ""), menu() + "\n");
    }

    #[test]
    fn test_list_empty() {
        let mut store = store("");
        assert_eq!(
            run(&mut store, "1\n5\n"),
            menu() + "Lista jest pusta.\n" + &menu()
        );
    }

    #[test]
    fn test_list() {
        let mut store = store("1;Koszulka;M;49.99\n2;Spodnie;L;89.50\n");
        assert_eq!(
            run(&mut store, "1\n5\n"),
            menu()
                + "ID: 1 | Koszulka | Rozmiar: M | Cena: 49.99 zł\n"
                + "ID: 2 | Spodnie | Rozmiar: L | Cena: 89.50 zł\n"
                + &menu()
        );
        assert_eq!(store.storage().saves(), 0);
    }

    #[test]
    fn test_invalid_choice() {
        let mut store = store("");
        assert_eq!(
            run(&mut store, "7\n5\n"),
            menu() + "Niepoprawny wybór.\n" + &menu()
        );
    }

    #[test]
    fn test_add() {
        let mut store = store("");
        let out = run(&mut store, "2\nKoszulka\nM\n49.99\n1\n5\n");
        assert_eq!(
            out,
            menu()
                + "Nazwa: Rozmiar: Cena: Dodano produkt.\n"
                + &menu()
                + "ID: 1 | Koszulka | Rozmiar: M | Cena: 49.99 zł\n"
                + &menu()
        );
        assert_eq!(store.storage().bytes(), b"1;Koszulka;M;49.99\n");
    }

    #[test]
    fn test_add_keeps_spaces_in_text() {
        let mut store = store("");
        run(&mut store, "2\nKurtka zimowa \n XL\n 399.00 \n5\n");
        assert_eq!(store.list()[0].name, "Kurtka zimowa ");
        assert_eq!(store.list()[0].size, " XL");
        assert_eq!(store.storage().bytes(), b"1;Kurtka zimowa ; XL;399.00\n");
    }

    #[test]
    fn test_add_windows_line_endings() {
        let mut store = store("");
        run(&mut store, "2\r\nKoszulka\r\nM\r\n49.99\r\n5\r\n");
        assert_eq!(store.storage().bytes(), b"1;Koszulka;M;49.99\n");
    }

    #[test]
    fn test_add_bad_price() {
        let mut store = store("");
        let out = run(&mut store, "2\nKoszulka\nM\ndrogo\n5\n");
        assert_eq!(
            out,
            menu() + "Nazwa: Rozmiar: Cena: Błędna cena!\n" + &menu()
        );
        assert!(store.list().is_empty());
        assert_eq!(store.storage().saves(), 0);
    }

    #[test]
    fn test_edit() {
        let mut store = store("1;Koszulka;M;49.99\n2;Spodnie;M;79.99\n");
        let out = run(&mut store, "3\n2\nSpodnie\nL\n89.50\n5\n");
        assert_eq!(
            out,
            menu()
                + "Podaj ID produktu do edycji: Nowa nazwa: Nowy rozmiar: Nowa cena: "
                + "Produkt został zaktualizowany.\n"
                + &menu()
        );
        assert_eq!(
            store.storage().bytes(),
            b"1;Koszulka;M;49.99\n2;Spodnie;L;89.50\n"
        );
    }

    #[test]
    fn test_edit_missing() {
        let mut store = store("1;Koszulka;M;49.99\n");
        let out = run(&mut store, "3\n4\nSpodnie\nL\n89.50\n5\n");
        assert_eq!(
            out,
            menu()
                + "Podaj ID produktu do edycji: Nowa nazwa: Nowy rozmiar: Nowa cena: "
                + "Nie znaleziono produktu o podanym ID.\n"
                + &menu()
        );
        assert_eq!(store.storage().saves(), 0);
    }

    #[test]
    fn test_edit_bad_id() {
        let mut store = store("1;Koszulka;M;49.99\n");
        let out = run(&mut store, "3\njeden\n5\n");
        assert_eq!(
            out,
            menu() + "Podaj ID produktu do edycji: Błędne ID!\n" + &menu()
        );
    }

    #[test]
    fn test_edit_bad_price() {
        let mut store = store("1;Koszulka;M;49.99\n");
        let out = run(&mut store, "3\n1\nKoszulka\nL\nx\n5\n");
        assert_eq!(
            out,
            menu()
                + "Podaj ID produktu do edycji: Nowa nazwa: Nowy rozmiar: Nowa cena: "
                + "Błędny format ceny!\n"
                + &menu()
        );
        assert_eq!(store.list()[0].size, "M");
        assert_eq!(store.storage().saves(), 0);
    }

    #[test]
    fn test_delete() {
        let mut store = store("1;Koszulka;M;49.99\n2;Spodnie;L;89.50\n");
        let out = run(&mut store, "4\n1\n4\n1\n4\nx\n5\n");
        assert_eq!(
            out,
            menu()
                + "Podaj ID do usunięcia: Usunięto produkt.\n"
                + &menu()
                + "Podaj ID do usunięcia: Nie znaleziono produktu o tym ID.\n"
                + &menu()
                + "Podaj ID do usunięcia: Błędny format ID!\n"
                + &menu()
        );
        assert_eq!(store.storage().bytes(), b"2;Spodnie;L;89.50\n");
        assert_eq!(store.storage().saves(), 1);
    }

    #[test]
    fn test_banner() {
        let mut store = store("");
        let out = run(&mut store, "5\n");
        let title = out.lines().nth(1).unwrap();
        assert_eq!(title, "   SKLEP ODZIEŻOWY - PANEL ZARZĄDZANIA  ");
    }

    #[test]
    fn test_padded_choice() {
        let mut store = store("1;Koszulka;M;49.99\n");
        assert_eq!(
            run(&mut store, " 1 \n5\n"),
            menu() + "Niepoprawny wybór.\n" + &menu()
        );
    }

    #[test]
    fn test_negative_id() {
        let mut store = store("-2;Koszulka;M;49.99\n0;Czapka;uni;10\n");
        let out = run(&mut store, "4\n-1\n3\n-5\na\nb\n1\n4\n-2\n5\n");
        assert_eq!(
            out,
            menu()
                + "Podaj ID do usunięcia: Nie znaleziono produktu o tym ID.\n"
                + &menu()
                + "Podaj ID produktu do edycji: Nowa nazwa: Nowy rozmiar: Nowa cena: "
                + "Nie znaleziono produktu o podanym ID.\n"
                + &menu()
                + "Podaj ID do usunięcia: Usunięto produkt.\n"
                + &menu()
        );
        assert_eq!(store.storage().bytes(), b"0;Czapka;uni;10\n");
    }

    #[test]
    fn test_end_of_input_mid_add() {
        let mut store = store("");
        let out = run(&mut store, "2\nKoszulka\n");
        assert_eq!(out, menu() + "Nazwa: Rozmiar: \n");
        assert!(store.list().is_empty());
    }
}
