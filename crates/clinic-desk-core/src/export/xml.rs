//! XML serialization of patient records.
//!
//! The backup document is a hand-rolled, indented XML tree: a `<Patients>`
//! root, one `<Patient>` element per record with each field as a child
//! element, and a nested `<Tests>`/`<Test>` sub-collection. The reader only
//! needs to understand documents this writer produces; it exists so a backup
//! can be verified after writing and restored from.

use std::fmt::Write as _;

use crate::models::{Gender, PatientRecord, TestEntry};

use super::{ExportError, ExportResult};

/// Serialize the full patient list to an indented XML document.
pub fn patients_to_xml(patients: &[PatientRecord]) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<Patients>\n");
    for p in patients {
        out.push_str("  <Patient>\n");
        write_field(&mut out, "record_id", &p.record_id);
        write_field(&mut out, "name", &p.name);
        write_field(&mut out, "age", &p.age.to_string());
        write_field(&mut out, "gender", &p.gender.to_string());
        write_field(&mut out, "phone", &p.phone);
        write_field(&mut out, "symptoms", &p.symptoms);
        out.push_str("    <Tests>\n");
        for t in &p.tests {
            out.push_str("      <Test>\n");
            let _ = writeln!(out, "        <name>{}</name>", escape_xml(&t.name));
            let _ = writeln!(out, "        <value>{}</value>", escape_xml(&t.value));
            let _ = writeln!(out, "        <cost>{}</cost>", t.cost);
            out.push_str("      </Test>\n");
        }
        out.push_str("    </Tests>\n");
        write_field(&mut out, "consultation_fee", &p.consultation_fee.to_string());
        write_field(&mut out, "total_amount", &p.total_amount.to_string());
        write_field(&mut out, "date", &p.date);
        if let Some(time) = &p.time {
            write_field(&mut out, "time", time);
        }
        out.push_str("  </Patient>\n");
    }
    out.push_str("</Patients>\n");
    out
}

/// Parse a document produced by [`patients_to_xml`] back into records.
pub fn patients_from_xml(document: &str) -> ExportResult<Vec<PatientRecord>> {
    let body = tag_text(document, "Patients")
        .ok_or_else(|| ExportError::Malformed("no <Patients> root element".into()))?;

    let mut patients = Vec::new();
    for block in tag_blocks(body, "Patient") {
        // Patient-level <name> precedes the <Tests> block; scan only the head
        // so an embedded test's <name> can never shadow it.
        let head = match block.find("<Tests>") {
            Some(idx) => &block[..idx],
            None => block,
        };
        let tests_body = tag_text(block, "Tests").unwrap_or("");
        let mut tests = Vec::new();
        for test_block in tag_blocks(tests_body, "Test") {
            tests.push(TestEntry {
                name: unescape_xml(required(test_block, "name")?),
                value: unescape_xml(required(test_block, "value")?),
                cost: parse_number(required(test_block, "cost")?)?,
            });
        }

        patients.push(PatientRecord {
            record_id: unescape_xml(required(block, "record_id")?),
            name: unescape_xml(required(head, "name")?),
            age: required(block, "age")?
                .parse()
                .map_err(|_| ExportError::InvalidNumber("age".into()))?,
            gender: parse_gender(required(block, "gender")?)?,
            phone: unescape_xml(required(block, "phone")?),
            symptoms: unescape_xml(required(block, "symptoms")?),
            tests,
            consultation_fee: parse_number(required(block, "consultation_fee")?)?,
            total_amount: parse_number(required(block, "total_amount")?)?,
            date: unescape_xml(required(block, "date")?),
            time: tag_text(block, "time").map(unescape_xml),
        });
    }
    Ok(patients)
}

fn write_field(out: &mut String, tag: &str, value: &str) {
    let _ = writeln!(out, "    <{tag}>{}</{tag}>", escape_xml(value));
}

fn required<'a>(block: &'a str, tag: &str) -> ExportResult<&'a str> {
    tag_text(block, tag).ok_or_else(|| ExportError::MissingField(tag.to_string()))
}

fn parse_number(text: &str) -> ExportResult<f64> {
    text.trim()
        .parse()
        .map_err(|_| ExportError::InvalidNumber(text.to_string()))
}

fn parse_gender(text: &str) -> ExportResult<Gender> {
    match text.trim() {
        "Male" => Ok(Gender::Male),
        "Female" => Ok(Gender::Female),
        "Other" => Ok(Gender::Other),
        other => Err(ExportError::InvalidGender(other.to_string())),
    }
}

/// Inner text of the first `<tag>...</tag>` pair.
fn tag_text<'a>(source: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = source.find(&open)? + open.len();
    let end = source[start..].find(&close)? + start;
    Some(source[start..end].trim_matches('\n'))
}

/// Inner text of every `<tag>...</tag>` pair, in document order.
fn tag_blocks<'a>(source: &'a str, tag: &str) -> Vec<&'a str> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let mut blocks = Vec::new();
    let mut pos = 0;
    while let Some(start) = source[pos..].find(&open) {
        let start = pos + start + open.len();
        let Some(end) = source[start..].find(&close) else {
            break;
        };
        let end = start + end;
        blocks.push(&source[start..end]);
        pos = end + close.len();
    }
    blocks
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
