//! XML record reading.
//!
//! Every child of the document root is one record. Inside a record, leaf
//! elements become columns named by their dotted path below the record
//! (`<location><lat>..</lat></location>` gives `location.lat`). Attributes
//! on the record element become columns of their own name; attributes on
//! nested elements become `path.attribute`. Repeated leaves are joined with
//! `"; "`.

use std::borrow::Cow;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{IngestError, Result};
use crate::table::{RawTable, RecordSet, normalize_cell};

#[derive(Debug)]
struct Frame {
    path: String,
    text: String,
    has_children: bool,
}

#[derive(Debug, Default)]
struct XmlRecords {
    set: RecordSet,
    record: Option<Vec<(String, Option<String>)>>,
    stack: Vec<Frame>,
    depth: usize,
}

impl XmlRecords {
    fn open(&mut self, element: &BytesStart<'_>) -> std::result::Result<(), String> {
        self.depth += 1;
        let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
        match self.depth {
            1 => {}
            2 => {
                let mut cells = Vec::new();
                for (key, value) in attributes(element)? {
                    insert_cell(&mut cells, key, normalize_cell(&value));
                }
                self.record = Some(cells);
                self.stack.push(Frame {
                    path: String::new(),
                    text: String::new(),
                    has_children: false,
                });
            }
            _ => {
                let path = match self.stack.last_mut() {
                    Some(parent) => {
                        parent.has_children = true;
                        if parent.path.is_empty() {
                            name
                        } else {
                            format!("{}.{name}", parent.path)
                        }
                    }
                    None => name,
                };
                if let Some(cells) = self.record.as_mut() {
                    for (key, value) in attributes(element)? {
                        insert_cell(cells, format!("{path}.{key}"), normalize_cell(&value));
                    }
                }
                self.stack.push(Frame {
                    path,
                    text: String::new(),
                    has_children: false,
                });
            }
        }
        Ok(())
    }

    fn close(&mut self) {
        match self.depth {
            0 | 1 => {}
            2 => {
                self.stack.pop();
                if let Some(cells) = self.record.take() {
                    self.set.push(cells);
                }
            }
            _ => {
                if let Some(frame) = self.stack.pop()
                    && !frame.has_children
                    && let Some(cells) = self.record.as_mut()
                {
                    insert_cell(cells, frame.path, normalize_cell(&frame.text));
                }
            }
        }
        self.depth = self.depth.saturating_sub(1);
    }

    fn text(&mut self, text: &str) {
        if self.depth >= 3
            && let Some(frame) = self.stack.last_mut()
        {
            frame.text.push_str(text);
        }
    }
}

pub(crate) fn read_xml(text: &str, path: &Path) -> Result<RawTable> {
    let xml_error = |message: String| IngestError::Xml {
        path: path.to_path_buf(),
        message,
    };

    let mut reader = Reader::from_str(text);
    let mut records = XmlRecords::default();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => records.open(&e).map_err(xml_error)?,
            Ok(Event::Empty(e)) => {
                records.open(&e).map_err(xml_error)?;
                records.close();
            }
            Ok(Event::End(_)) => records.close(),
            Ok(Event::Text(t)) => {
                let raw = String::from_utf8_lossy(&t);
                records.text(&unescape(&raw));
            }
            Ok(Event::CData(c)) => {
                records.text(&String::from_utf8_lossy(&c.into_inner()));
            }
            Ok(Event::GeneralRef(r)) => {
                let name = String::from_utf8_lossy(&r);
                match resolve_entity(&name) {
                    Some(resolved) => records.text(&resolved),
                    None => records.text(&format!("&{name};")),
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(xml_error(format!(
                    "at byte {}: {e}",
                    reader.error_position()
                )));
            }
        }
    }

    if records.set.len() == 0 {
        return Err(IngestError::NoRecords {
            path: path.to_path_buf(),
        });
    }
    Ok(records.set.finish())
}

fn attributes(element: &BytesStart<'_>) -> std::result::Result<Vec<(String, String)>, String> {
    let mut out = Vec::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        out.push((key, unescape(&raw).into_owned()));
    }
    Ok(out)
}

fn insert_cell(cells: &mut Vec<(String, Option<String>)>, key: String, value: Option<String>) {
    match cells.iter_mut().find(|(existing, _)| *existing == key) {
        Some((_, slot)) => match (slot.as_mut(), value) {
            (Some(current), Some(value)) => {
                current.push_str("; ");
                current.push_str(&value);
            }
            (None, value) => *slot = value,
            (Some(_), None) => {}
        },
        None => cells.push((key, value)),
    }
}

fn unescape(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }
    quick_xml::escape::unescape(raw).unwrap_or(Cow::Borrowed(raw))
}

/// Resolves the predefined entities and numeric character references.
fn resolve_entity(name: &str) -> Option<String> {
    let resolved = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)?
        }
    };
    Some(resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> RawTable {
        read_xml(text, Path::new("cad.xml")).unwrap()
    }

    #[test]
    fn reads_records_with_nesting_and_attributes() {
        let table = read(
            r#"<?xml version="1.0"?>
            <incidents>
              <incident id="F-1">
                <type>Fire</type>
                <location units="deg">
                  <latitude>39.7392</latitude>
                  <longitude>-104.9903</longitude>
                </location>
                <address>Main St &amp; 5th Ave</address>
              </incident>
              <incident id="F-2">
                <type><![CDATA[EMS <ALS>]]></type>
                <notes/>
              </incident>
            </incidents>"#,
        );
        assert_eq!(
            table.headers,
            vec![
                "id",
                "type",
                "location.units",
                "location.latitude",
                "location.longitude",
                "address",
                "notes"
            ]
        );
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][3].as_deref(), Some("39.7392"));
        assert_eq!(table.rows[0][5].as_deref(), Some("Main St & 5th Ave"));
        assert_eq!(table.rows[1][0].as_deref(), Some("F-2"));
        assert_eq!(table.rows[1][1].as_deref(), Some("EMS <ALS>"));
        assert_eq!(table.rows[1][6], None);
    }

    #[test]
    fn repeated_leaves_are_joined() {
        let table = read("<r><call><unit>E1</unit><unit>M3</unit></call></r>");
        assert_eq!(table.headers, vec!["unit"]);
        assert_eq!(table.rows[0][0].as_deref(), Some("E1; M3"));
    }

    #[test]
    fn root_without_children_has_no_records() {
        assert!(matches!(
            read_xml("<incidents/>", Path::new("x.xml")),
            Err(IngestError::NoRecords { .. })
        ));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(matches!(
            read_xml("<a><b></a>", Path::new("x.xml")),
            Err(IngestError::Xml { .. })
        ));
    }

    #[test]
    fn entities_resolve() {
        assert_eq!(resolve_entity("amp").as_deref(), Some("&"));
        assert_eq!(resolve_entity("#x41").as_deref(), Some("A"));
        assert_eq!(resolve_entity("#66").as_deref(), Some("B"));
        assert_eq!(resolve_entity("nbsp"), None);
    }
}
