use crate::snapshot::{EntryPayload, SnapshotEntry};
use serde::Serialize;
use std::fmt::{self, Write};

/// Ordered demo entries. `Display` renders the `api.post` replacement that
/// the demo client pastes in verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<SnapshotEntry>,
}

impl Transcript {
    pub fn new(entries: Vec<SnapshotEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }
}

/// Writes `s` as a JSON string literal, which is also a valid JavaScript one.
fn literal(f: &mut impl Write, s: &str) -> fmt::Result {
    let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
    f.write_str(&quoted)
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "/*")?;
        writeln!(
            f,
            " * Recorded responses for {} functions.",
            self.entries.len()
        )?;
        writeln!(f, " * Replace api.post() in the demo client with the code below.")?;
        writeln!(f, " */")?;
        writeln!(f, "api.post = function (fn, params, callback) {{")?;
        writeln!(f, "\tlet data = null;")?;
        writeln!(f)?;
        writeln!(f, "\tswitch (fn) {{")?;

        for entry in &self.entries {
            write!(f, "\t\tcase ")?;
            literal(f, &entry.name)?;
            writeln!(f, ":")?;

            match &entry.payload {
                EntryPayload::String { data } => {
                    write!(f, "\t\t\tdata = ")?;
                    literal(f, data)?;
                    writeln!(f, ";")?;
                }
                EntryPayload::Array { kind, array } => {
                    writeln!(f, "\t\t\tswitch (params.{}) {{", kind.as_str())?;
                    for record in array {
                        write!(f, "\t\t\t\tcase ")?;
                        literal(f, &record.id)?;
                        writeln!(f, ":")?;
                        write!(f, "\t\t\t\t\tdata = ")?;
                        literal(f, &record.data)?;
                        writeln!(f, ";")?;
                        writeln!(f, "\t\t\t\t\tbreak;")?;
                    }
                    writeln!(f, "\t\t\t}}")?;
                }
            }

            writeln!(f, "\t\t\tbreak;")?;
            writeln!(f)?;
        }

        writeln!(f, "\t}}")?;
        writeln!(f)?;
        writeln!(f, "\tif (data === null) {{")?;
        writeln!(f, "\t\tconsole.error(\"demo: no recorded response for \" + fn);")?;
        writeln!(f, "\t\treturn;")?;
        writeln!(f, "\t}}")?;
        writeln!(f)?;
        writeln!(f, "\tcallback(JSON.parse(data));")?;
        writeln!(f, "}};")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{EntryKind, SnapshotRecord};

    fn transcript() -> Transcript {
        Transcript::new(vec![
            SnapshotEntry {
                name: "Session::init()".into(),
                payload: EntryPayload::String {
                    data: r#"{"status":1,"title":"it's \"quoted\""}"#.into(),
                },
            },
            SnapshotEntry {
                name: "Album::get".into(),
                payload: EntryPayload::Array {
                    kind: EntryKind::AlbumId,
                    array: vec![SnapshotRecord {
                        id: "album0000000000000000001".into(),
                        data: "{}".into(),
                    }],
                },
            },
        ])
    }

    #[test]
    fn renders_each_function_once() {
        let text = transcript().to_string();
        assert_eq!(text.matches("case \"Session::init()\":").count(), 1);
        assert_eq!(text.matches("case \"Album::get\":").count(), 1);
        assert!(text.contains("switch (params.albumID)"));
        assert!(text.contains("case \"album0000000000000000001\":"));
        assert!(text.starts_with("/*"));
    }

    #[test]
    fn payloads_are_escaped_string_literals() {
        let text = transcript().to_string();
        assert!(text.contains(r#"data = "{\"status\":1,\"title\":\"it's \\\"quoted\\\"\"}";"#));
    }

    #[test]
    fn serializes_as_entry_list() {
        let value = serde_json::to_value(transcript()).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["type"], "string");
        assert_eq!(entries[1]["type"], "array");
        assert_eq!(entries[1]["kind"], "albumID");
        assert_eq!(entries[1]["array"][0]["id"], "album0000000000000000001");
    }
}
