use crate::core::cluster::{ImageRecord, SimilarityGroup};
use crate::core::hash::HashValue;
use serde::Serialize;
use std::fmt::Write as _;
use std::io::{self, Write};

/// Textual form a hash is printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Binary,
    Hex,
    Base64,
}

impl OutputFormat {
    pub fn render(&self, hash: &HashValue) -> String {
        match self {
            OutputFormat::Binary => hash.to_binary_string(),
            OutputFormat::Hex => hash.to_hex(),
            OutputFormat::Base64 => hash.to_base64(),
        }
    }
}

#[derive(Serialize)]
struct HashRow<'a> {
    file: &'a str,
    hash: String,
    kind: String,
    bits: usize,
}

fn hash_row(record: &ImageRecord, format: OutputFormat) -> HashRow<'_> {
    HashRow {
        file: &record.source_id,
        hash: format.render(&record.hash),
        kind: record.hash.kind().to_string(),
        bits: record.hash.bits(),
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn write_csv_row<W: Write>(out: &mut W, fields: &[&str]) -> io::Result<()> {
    let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    writeln!(out, "{}", line.join(","))
}

/// `File,Hash,HashType,Bits` table.
pub fn write_hashes_csv<W: Write>(
    out: &mut W,
    records: &[ImageRecord],
    format: OutputFormat,
) -> io::Result<()> {
    write_csv_row(out, &["File", "Hash", "HashType", "Bits"])?;
    for record in records {
        let row = hash_row(record, format);
        let bits = row.bits.to_string();
        write_csv_row(out, &[row.file, row.hash.as_str(), row.kind.as_str(), bits.as_str()])?;
    }
    Ok(())
}

/// `Group,File,Hash` table, one row per member.
pub fn write_groups_csv<W: Write>(
    out: &mut W,
    groups: &[SimilarityGroup],
    format: OutputFormat,
) -> io::Result<()> {
    write_csv_row(out, &["Group", "File", "Hash"])?;
    for (i, group) in groups.iter().enumerate() {
        let label = format!("Group {}", i + 1);
        for member in &group.members {
            let hash = format.render(&member.hash);
            write_csv_row(out, &[label.as_str(), member.source_id.as_str(), hash.as_str()])?;
        }
    }
    Ok(())
}

pub fn render_hashes_text(records: &[ImageRecord], format: OutputFormat) -> String {
    let mut out = String::new();
    for record in records {
        let row = hash_row(record, format);
        let _ = writeln!(out, "{}: {} ({})", row.file, row.hash, row.kind);
    }
    out
}

pub fn render_groups_text(groups: &[SimilarityGroup]) -> String {
    if groups.is_empty() {
        return "No similar images found\n".to_string();
    }
    let mut out = format!("Found {} groups of similar images:\n\n", groups.len());
    for (i, group) in groups.iter().enumerate() {
        let _ = writeln!(out, "Group {} (threshold: {}):", i + 1, group.threshold);
        for id in group.source_ids() {
            let _ = writeln!(out, "  {id}");
        }
        out.push('\n');
    }
    out
}

pub fn hashes_json(records: &[ImageRecord], format: OutputFormat) -> serde_json::Result<String> {
    let rows: Vec<HashRow<'_>> = records.iter().map(|r| hash_row(r, format)).collect();
    serde_json::to_string_pretty(&rows)
}

pub fn groups_json(groups: &[SimilarityGroup]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cluster::cluster;
    use crate::core::hash::HashKind;
    use pretty_assertions::assert_eq;

    fn record(id: &str, word: u64) -> ImageRecord {
        ImageRecord::new(
            id,
            HashValue::from_words(vec![word], HashKind::DoubleGradient, 8).unwrap(),
        )
    }

    #[test]
    fn test_output_format_render() {
        let hash = HashValue::from_words(vec![0x61], HashKind::Average, 8).unwrap();
        assert_eq!(OutputFormat::Binary.render(&hash), "01100001");
        assert_eq!(OutputFormat::Hex.render(&hash), "61");
        assert_eq!(OutputFormat::Base64.render(&hash), "YQ");
    }

    #[test]
    fn test_hashes_csv() {
        let mut out = Vec::new();
        write_hashes_csv(&mut out, &[record("a,b.png", 0x0F)], OutputFormat::Hex).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "File,Hash,HashType,Bits\n\"a,b.png\",0f,double-gradient,8\n"
        );
    }

    #[test]
    fn test_groups_csv_and_text() {
        let groups = cluster(
            vec![record("one.png", 0x00), record("two.png", 0x01)],
            1,
        );

        let mut out = Vec::new();
        write_groups_csv(&mut out, &groups, OutputFormat::Binary).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Group,File,Hash\nGroup 1,one.png,00000000\nGroup 1,two.png,00000001\n"
        );

        assert_eq!(
            render_groups_text(&groups),
            "Found 1 groups of similar images:\n\nGroup 1 (threshold: 1):\n  one.png\n  two.png\n\n"
        );
    }

    #[test]
    fn test_no_groups_text() {
        assert_eq!(render_groups_text(&[]), "No similar images found\n");
    }

    #[test]
    fn test_hashes_json() {
        let json = hashes_json(&[record("a.png", 0x61)], OutputFormat::Base64).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["file"], "a.png");
        assert_eq!(value[0]["hash"], "YQ");
        assert_eq!(value[0]["bits"], 8);
    }
}
