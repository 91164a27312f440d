//! Line-oriented command shell over a `ContactBook`.
//!
//! All prompting and rendering lives here; the core only returns data.

use anyhow::{Context, Result};
use contactbook_core::{
    BookResult, Contact, ContactBook, ContactField, ContactPersistence, LoadReport, Mutation,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const HELP: &str = "\
Commands:
  add        add a contact
  list       show all contacts, newest first
  search     find contacts by name, phone or category fragment
  category   find contacts in one category
  delete     delete a contact by name
  update     change one field of a contact
  sort       show contact names in sorted order
  undo       undo the last change
  redo       redo the last undone change
  graph      show the relationship chain
  help       show this list
  quit       exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Add,
    List,
    Search,
    Category,
    Delete,
    Update,
    Sort,
    Undo,
    Redo,
    Graph,
    Help,
    Quit,
}

impl Command {
    fn parse(input: &str) -> Option<Self> {
        let command = match input.trim().to_ascii_lowercase().as_str() {
            "add" | "1" => Self::Add,
            "list" | "2" => Self::List,
            "undo" | "3" => Self::Undo,
            "redo" | "4" => Self::Redo,
            "search" | "5" => Self::Search,
            "category" | "6" => Self::Category,
            "delete" | "7" => Self::Delete,
            "update" | "8" => Self::Update,
            "sort" | "9" => Self::Sort,
            "graph" => Self::Graph,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "0" => Self::Quit,
            _ => return None,
        };
        Some(command)
    }
}

/// Prints what happened while loading the contact file.
pub fn print_load_report(report: &LoadReport) {
    if let Some(warning) = &report.warning {
        eprintln!("Warning: {warning}");
    }
    for row in &report.rejected {
        eprintln!("Warning: skipped line {}: {}", row.line, row.error);
    }
    if report.loaded > 0 {
        println!("Loaded {} contact(s).", report.loaded);
    }
}

/// Reads commands until `quit` or end of input.
pub fn run<P: ContactPersistence>(book: &mut ContactBook<P>) -> Result<()> {
    let mut editor = DefaultEditor::new().context("failed to start line editor")?;
    println!("{HELP}");

    loop {
        let Some(line) = prompt(&mut editor, "contacts> ")? else {
            break;
        };
        if line.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(line.as_str());

        match Command::parse(&line) {
            Some(Command::Quit) => break,
            Some(command) => {
                if !execute(book, &mut editor, command)? {
                    break;
                }
            }
            None => eprintln!("Error: unknown command `{line}`; type `help`."),
        }
    }

    println!("Exiting program.");
    Ok(())
}

/// Runs one command. Returns `false` when input ended mid-command.
fn execute<P: ContactPersistence>(
    book: &mut ContactBook<P>,
    editor: &mut DefaultEditor,
    command: Command,
) -> Result<bool> {
    match command {
        Command::Add => {
            let Some(name) = prompt(editor, "Name: ")? else {
                return Ok(false);
            };
            let Some(phone) = prompt(editor, "Phone: ")? else {
                return Ok(false);
            };
            let Some(category) = prompt(editor, "Category: ")? else {
                return Ok(false);
            };
            report("Contact added", book.add(name, phone, category));
        }
        Command::List => {
            if book.is_empty() {
                println!("No contacts to display.");
            }
            for contact in book.contacts() {
                println!("{}", render(contact));
            }
        }
        Command::Search => {
            let Some(term) = prompt(editor, "Search term: ")? else {
                return Ok(false);
            };
            print_matches(book.search(&term));
        }
        Command::Category => {
            let Some(category) = prompt(editor, "Category: ")? else {
                return Ok(false);
            };
            print_matches(book.search_by_category(&category));
        }
        Command::Delete => {
            let Some(name) = prompt(editor, "Name to delete: ")? else {
                return Ok(false);
            };
            report("Contact deleted", book.delete(&name));
        }
        Command::Update => {
            let Some(name) = prompt(editor, "Name to update: ")? else {
                return Ok(false);
            };
            if !book.exists(&name) {
                eprintln!("Error: contact not found. Update failed.");
                return Ok(true);
            }
            let Some(field) = prompt_field(editor)? else {
                return Ok(false);
            };
            let Some(value) = prompt(editor, &format!("New {}: ", field.as_str()))? else {
                return Ok(false);
            };
            report("Contact updated", book.update(&name, field, value));
        }
        Command::Sort => {
            let names = book.sorted_view();
            if names.is_empty() {
                println!("No contacts to sort.");
            }
            for name in names {
                println!("{name}");
            }
        }
        Command::Undo => report("Undone", book.undo()),
        Command::Redo => report("Redone", book.redo()),
        Command::Graph => {
            for node in book.graph().nodes() {
                let neighbors = book.graph().neighbors(&node.name);
                println!(
                    "{} [{}] -> {}",
                    node.name,
                    node.category,
                    if neighbors.is_empty() {
                        "-".to_string()
                    } else {
                        neighbors.join(", ")
                    }
                );
            }
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

/// Asks until a known field label is entered; `None` when input ends.
fn prompt_field(editor: &mut DefaultEditor) -> Result<Option<ContactField>> {
    loop {
        let Some(input) = prompt(editor, "Field to update (name/phone/category): ")? else {
            return Ok(None);
        };
        match ContactField::parse(&input) {
            Some(field) => return Ok(Some(field)),
            None => eprintln!("Invalid field. Please enter name, phone or category."),
        }
    }
}

/// Reads one trimmed line; `None` on end of input or interrupt.
fn prompt(editor: &mut DefaultEditor, label: &str) -> Result<Option<String>> {
    match editor.readline(label) {
        Ok(line) => Ok(Some(line.trim().to_string())),
        Err(ReadlineError::Eof | ReadlineError::Interrupted) => Ok(None),
        Err(err) => Err(err).context("failed to read input"),
    }
}

fn report(action: &str, outcome: BookResult<Mutation>) {
    match outcome {
        Ok(mutation) => {
            println!("{action}: {}", render(&mutation.contact));
            if let Some(warning) = mutation.warning {
                eprintln!("Warning: {warning}");
            }
        }
        Err(err) => eprintln!("Error: {err}"),
    }
}

fn print_matches<'a>(matches: impl Iterator<Item = &'a Contact>) {
    let mut found = false;
    for contact in matches {
        found = true;
        println!("Contact found: {}", render(contact));
    }
    if !found {
        println!("No matching contacts.");
    }
}

fn render(contact: &Contact) -> String {
    format!(
        "Name: {}\tPhone: {}\tCategory: {}",
        contact.name, contact.phone, contact.category
    )
}
