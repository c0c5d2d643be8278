//! Tables rendered with tabled: column tables for loads and matches and name/value
//! tables for the header.
use crate::utils::Styling;
use crate::utils::uwriteln;
use std::fmt::Display;
use std::io::Write;
use tabled::{
    builder::Builder,
    settings::{Alignment, Padding, Style, object::Columns},
};

/// Styles a value for use as a table cell.
pub fn field(value: impl Display) -> String {
    let s = value.to_string();
    if s.is_empty() {
        // tabled misaligns rows with empty cells
        " ".table_field().to_string()
    } else {
        s.table_field().to_string()
    }
}

struct Column {
    title: &'static str,
    align: Alignment,
    help: &'static str,
}

/// Table with a title per column. Matches look like this:
/// string      offset (hex)  offset (dec)  vaddr             if titles
/// ------      ------------  ------------  -----
/// /bin/sh\0     0x00000200           512  0x00400200
/// dash\0        0x00001080          4224  not applicable
///
/// string: the target that was found                        if explain
/// ...
pub struct TableBuilder {
    cols: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl TableBuilder {
    pub fn new() -> TableBuilder {
        TableBuilder {
            cols: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn add_col_l(&mut self, title: &'static str, help: &'static str) {
        self.add_col(title, help, Alignment::left());
    }

    pub fn add_col_r(&mut self, title: &'static str, help: &'static str) {
        self.add_col(title, help, Alignment::right());
    }

    /// Cells are in add_col order and are normally built with field.
    pub fn add_row(&mut self, cells: Vec<String>) {
        debug_assert_eq!(cells.len(), self.cols.len());
        self.rows.push(cells);
    }

    pub fn writeln(&self, out: impl Write, titles: bool, explain: bool) {
        let mut records = Vec::with_capacity(self.rows.len() + 2);
        if titles {
            records.push(
                self.cols
                    .iter()
                    .map(|c| c.title.table_header().to_string())
                    .collect(),
            );
            records.push(
                self.cols
                    .iter()
                    .map(|c| "-".repeat(c.title.len()).table_sep().to_string())
                    .collect(),
            );
        }
        records.extend(self.rows.iter().cloned());

        let aligns: Vec<Alignment> = self.cols.iter().map(|c| c.align).collect();
        let helps = self.cols.iter().map(|c| (c.title, c.help));
        write_table(out, render(records, &aligns), explain.then(|| explanation(helps)));
    }

    fn add_col(&mut self, title: &'static str, help: &'static str, align: Alignment) {
        debug_assert!(self.cols.iter().all(|c| c.title != title));
        self.cols.push(Column { title, align, help });
    }
}

struct NameValue {
    name: &'static str,
    value: String,
    help: &'static str,
}

/// Two left aligned columns and no titles, e.g.
/// type     executable
/// pie      no
///
/// type: type of ELF file                                   if explain
/// pie: ...
pub struct SimpleTableBuilder {
    rows: Vec<NameValue>,
}

impl SimpleTableBuilder {
    pub fn new() -> SimpleTableBuilder {
        SimpleTableBuilder { rows: Vec::new() }
    }

    /// Typically add_simple! is used instead.
    pub fn add_row(&mut self, name: &'static str, value: String, help: &'static str) {
        self.rows.push(NameValue { name, value, help });
    }

    pub fn writeln(&self, out: impl Write, explain: bool) {
        let records = self
            .rows
            .iter()
            .map(|r| vec![r.name.to_string(), r.value.clone()]);
        let helps = self.rows.iter().map(|r| (r.name, r.help));
        write_table(
            out,
            render(records, &[Alignment::left(), Alignment::left()]),
            explain.then(|| explanation(helps)),
        );
    }
}

macro_rules! add_simple {
    ($builder:ident, $name:literal, $value:expr, $help:expr) => {
        $builder.add_row($name, $crate::commands::tables::field($value), $help);
    };
    ($builder:ident, $name:literal, $format:literal, $value:expr, $help:expr) => {
        $builder.add_row(
            $name,
            $crate::commands::tables::field(format!($format, $value)),
            $help,
        );
    };
}
pub(crate) use add_simple;

fn render(records: impl IntoIterator<Item = Vec<String>>, aligns: &[Alignment]) -> String {
    let mut builder = Builder::with_capacity(0, aligns.len());
    for record in records {
        builder.push_record(record);
    }

    let mut table = builder.build();
    for (i, align) in aligns.iter().enumerate() {
        table.modify(Columns::one(i), *align);
    }
    table.modify(Columns::first(), Padding::new(0, 1, 0, 0));
    table.with(Style::empty());
    table.to_string()
}

fn explanation<'a>(helps: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let lines: Vec<String> = helps
        .map(|(name, help)| format!("{}: {}", name.explain_title(), help.explain_text()))
        .collect();
    lines.join("\n")
}

fn write_table(mut out: impl Write, table: String, explanation: Option<String>) {
    uwriteln!(out, "{table}");
    if let Some(text) = explanation {
        uwriteln!(out);
        uwriteln!(out, "{text}");
    }
}
