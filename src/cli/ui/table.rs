use std::fmt::{self, Display, Formatter};

use tabled::{builder::Builder, settings::Style as TableStyle};

use super::painter::Painter;

/// Two-column field/value table with muted field names.
#[derive(Debug)]
pub(crate) struct FieldTable {
    rows: Vec<[String; 2]>,
}

impl FieldTable {
    pub(crate) fn new<'a>(
        painter: &Painter,
        rows: impl IntoIterator<Item = (&'a str, String)>,
    ) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|(field, value)| [painter.muted(field), value])
                .collect(),
        }
    }
}

impl Display for FieldTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut builder = Builder::default();
        for row in &self.rows {
            builder.push_record(row);
        }
        let mut table = builder.build();
        table.with(TableStyle::rounded());
        write!(f, "{table}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_every_row() {
        let painter = Painter::new(false);
        let table = FieldTable::new(
            &painter,
            [("universe", "1".to_string()), ("channels", "512".to_string())],
        );

        let rendered = table.to_string();

        assert!(rendered.starts_with('╭'));
        assert!(rendered.contains("universe"));
        assert!(rendered.contains("512"));
    }
}
