use chrono::NaiveDate;
use log::debug;
use std::sync::OnceLock;

use crate::literal::{format_value, LeafKind, Scalar};
use crate::model::*;

/// The skeleton of the website's data file.
const TEMPLATE_TEXT: &str = include_str!("template.php");

/// The named functions of the data file. Each returns one literal array.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Block {
    Meta,
    Data,
    Personen,
    Seats,
    Types,
}

impl Block {
    pub const ALL: [Block; 5] = [
        Block::Meta,
        Block::Data,
        Block::Personen,
        Block::Seats,
        Block::Types,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Block::Meta => "meta",
            Block::Data => "data",
            Block::Personen => "personen",
            Block::Seats => "seats",
            Block::Types => "types",
        }
    }

    fn from_name(name: &str) -> Option<Block> {
        Block::ALL.iter().find(|b| b.name() == name).copied()
    }
}

/// The serialized arrays of the five blocks.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RenderedBlocks {
    pub meta: String,
    pub data: String,
    pub personen: String,
    pub seats: String,
    pub types: String,
}

impl RenderedBlocks {
    pub fn get(&self, block: Block) -> &str {
        match block {
            Block::Meta => &self.meta,
            Block::Data => &self.data,
            Block::Personen => &self.personen,
            Block::Seats => &self.seats,
            Block::Types => &self.types,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum Placeholder {
    /// `{year}`: the year of the election day.
    Year,
    /// `{meta}`, `{data}`, ...: a serialized block.
    Block(Block),
}

impl Placeholder {
    fn from_name(name: &str) -> Option<Placeholder> {
        if name == "year" {
            Some(Placeholder::Year)
        } else {
            Block::from_name(name).map(Placeholder::Block)
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
enum Segment {
    Text(&'static str),
    Placeholder(Placeholder),
}

/// The template, split into literal text and placeholders.
#[derive(Debug)]
pub(crate) struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// The built-in template, parsed on first use.
    pub(crate) fn get() -> &'static Template {
        static TEMPLATE: OnceLock<Template> = OnceLock::new();
        TEMPLATE.get_or_init(|| Template::parse(TEMPLATE_TEXT))
    }

    /// Splits `text` at the known placeholders. Other braces are PHP code and
    /// stay in the text.
    fn parse(text: &'static str) -> Template {
        let mut segments: Vec<Segment> = Vec::new();
        let mut literal_start = 0;
        let mut search_from = 0;
        while let Some(offset) = text[search_from..].find('{') {
            let open = search_from + offset;
            let placeholder = text[open + 1..].find('}').and_then(|len| {
                Placeholder::from_name(&text[open + 1..open + 1 + len]).map(|p| (p, len))
            });
            match placeholder {
                Some((p, len)) => {
                    if literal_start < open {
                        segments.push(Segment::Text(&text[literal_start..open]));
                    }
                    segments.push(Segment::Placeholder(p));
                    literal_start = open + len + 2;
                    search_from = literal_start;
                }
                None => {
                    search_from = open + 1;
                }
            }
        }
        if literal_start < text.len() {
            segments.push(Segment::Text(&text[literal_start..]));
        }
        debug!("Template::parse: {:?} segments", segments.len());
        Template { segments }
    }

    /// Substitutes the year of `date` and the blocks.
    pub(crate) fn fill(&self, date: NaiveDate, blocks: &RenderedBlocks) -> RenderResult<String> {
        let year = format_value(&Scalar::Date(date), LeafKind::Year)?;
        let mut res = String::new();
        for segment in self.segments.iter() {
            match segment {
                Segment::Text(s) => res.push_str(s),
                Segment::Placeholder(Placeholder::Year) => res.push_str(&year),
                Segment::Placeholder(Placeholder::Block(b)) => res.push_str(blocks.get(*b)),
            }
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks() -> RenderedBlocks {
        RenderedBlocks {
            meta: "M".to_string(),
            data: "D".to_string(),
            personen: "P".to_string(),
            seats: "S".to_string(),
            types: "T".to_string(),
        }
    }

    #[test]
    fn parse_keeps_php_braces() {
        let t = Template::parse("function f_{year}() {\n\treturn {seats};\n}\n{unknown}");
        assert_eq!(
            t.segments,
            vec![
                Segment::Text("function f_"),
                Segment::Placeholder(Placeholder::Year),
                Segment::Text("() {\n\treturn "),
                Segment::Placeholder(Placeholder::Block(Block::Seats)),
                Segment::Text(";\n}\n{unknown}"),
            ]
        );
    }

    #[test]
    fn builtin_template_has_every_block() {
        let t = Template::get();
        for b in Block::ALL.iter() {
            let count = t
                .segments
                .iter()
                .filter(|s| **s == Segment::Placeholder(Placeholder::Block(*b)))
                .count();
            assert_eq!(count, 1, "block {}", b.name());
        }
    }

    #[test]
    fn fill_builtin() {
        let date = NaiveDate::from_ymd_opt(2023, 5, 14).unwrap();
        let s = Template::get().fill(date, &blocks()).unwrap();
        assert_eq!(
            s,
            "<?php\nfunction data_2023_get_meta() {\n\treturn M;\n}\n\n\
             function data_2023_get_data() {\n\treturn D;\n}\n\n\
             function data_2023_get_personen() {\n\treturn P;\n}\n\n\
             function data_2023_get_seats() {\n\treturn S;\n}\n\n\
             function data_2023_get_types() {\n\treturn T;\n}\n"
        );
    }

    #[test]
    fn fill_rejects_short_years() {
        let date = NaiveDate::from_ymd_opt(998, 1, 1).unwrap();
        assert!(matches!(
            Template::get().fill(date, &blocks()),
            Err(RenderError::Format { .. })
        ));
    }
}
