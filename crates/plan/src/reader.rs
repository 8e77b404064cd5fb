//! Plan deserialization.

use std::fs;
use std::io;
use std::path::Path;

use codesync_core::RelativePath;
use quick_xml::events::Event;
use quick_xml::Reader;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::OffsetDateTime;
use tracing::warn;

use crate::{Plan, PlanEntry, PlanError};

/// Loads and parses the plan at `path`.
pub fn load(path: &Path) -> Result<Plan, PlanError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            return Err(PlanError::InputNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(error) => return Err(error.into()),
    };
    parse(&text)
}

/// Parses a plan from XML text.
///
/// Comments are skipped, including the candidate hints the matcher writes
/// into ambiguous entries. Unknown elements inside the root are ignored so a
/// newer tool version can read an older document.
pub fn parse(text: &str) -> Result<Plan, PlanError> {
    let mut reader = Reader::from_str(text);
    let mut found_root = false;
    let mut source_dir: Option<String> = None;
    let mut dest_dir: Option<String> = None;
    let mut modified_time: Option<OffsetDateTime> = None;
    let mut entries: Vec<PlanEntry> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) if !found_root => {
                if start.name().as_ref() == ROOT.as_bytes() {
                    found_root = true;
                } else {
                    return Err(PlanError::MissingRoot);
                }
            }
            Event::Empty(start) if !found_root => {
                if start.name().as_ref() == ROOT.as_bytes() {
                    found_root = true;
                } else {
                    return Err(PlanError::MissingRoot);
                }
            }
            Event::Start(start) => match start.name().as_ref() {
                b"SourceDirectory" => {
                    source_dir = Some(read_element_text(&mut reader, "SourceDirectory")?);
                }
                b"DestDirectory" => {
                    dest_dir = Some(read_element_text(&mut reader, "DestDirectory")?);
                }
                b"ModifiedTime" => {
                    let raw = read_element_text(&mut reader, "ModifiedTime")?;
                    modified_time = parse_timestamp(&raw);
                }
                b"Copy" => {
                    let (source, dest) = read_pair(&mut reader, "Copy")?;
                    entries.push(PlanEntry::Copy { source, dest });
                }
                b"Ignore" => {
                    let (source, dest) = read_pair(&mut reader, "Ignore")?;
                    entries.push(PlanEntry::Ignore { source, dest });
                }
                _ => {
                    reader.read_to_end(start.name())?;
                }
            },
            Event::Empty(start) => match start.name().as_ref() {
                b"Copy" => entries.push(PlanEntry::Copy {
                    source: None,
                    dest: None,
                }),
                b"Ignore" => entries.push(PlanEntry::Ignore {
                    source: None,
                    dest: None,
                }),
                _ => {}
            },
            Event::End(end) if end.name().as_ref() == ROOT.as_bytes() => break,
            Event::Eof => break,
            _ => {}
        }
    }

    if !found_root {
        return Err(PlanError::MissingRoot);
    }
    let source_dir = source_dir.filter(|dir| !dir.is_empty()).ok_or(
        PlanError::MissingDirectory {
            element: "SourceDirectory",
        },
    )?;
    let dest_dir = dest_dir
        .filter(|dir| !dir.is_empty())
        .ok_or(PlanError::MissingDirectory {
            element: "DestDirectory",
        })?;

    let mut plan = Plan::new(source_dir, dest_dir, modified_time);
    for entry in entries {
        plan.push(entry);
    }
    Ok(plan)
}

const ROOT: &str = "CodeSync";

/// Reads `Source`/`Destination` children until the named element closes.
fn read_pair(
    reader: &mut Reader<&[u8]>,
    element: &'static str,
) -> Result<(Option<RelativePath>, Option<RelativePath>), PlanError> {
    let mut source: Option<RelativePath> = None;
    let mut dest: Option<RelativePath> = None;
    loop {
        match reader.read_event()? {
            Event::Start(start) => match start.name().as_ref() {
                b"Source" => {
                    source = non_empty(read_element_text(reader, "Source")?);
                }
                b"Destination" => {
                    dest = non_empty(read_element_text(reader, "Destination")?);
                }
                _ => {
                    reader.read_to_end(start.name())?;
                }
            },
            Event::End(end) if end.name().as_ref() == element.as_bytes() => break,
            Event::Eof => return Err(unexpected_eof(element)),
            _ => {}
        }
    }
    Ok((source, dest))
}

/// Accumulates text content until the named element closes.
fn read_element_text(
    reader: &mut Reader<&[u8]>,
    element: &'static str,
) -> Result<String, PlanError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(chunk) => text.push_str(&chunk.unescape()?),
            Event::End(end) if end.name().as_ref() == element.as_bytes() => break,
            Event::Eof => return Err(unexpected_eof(element)),
            _ => {}
        }
    }
    Ok(text.trim().to_string())
}

fn non_empty(text: String) -> Option<RelativePath> {
    if text.is_empty() {
        None
    } else {
        Some(RelativePath::new(text))
    }
}

fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    if raw.is_empty() {
        return None;
    }
    OffsetDateTime::parse(raw, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(raw, &Iso8601::DEFAULT))
        .map_err(|error| {
            warn!(timestamp = raw, %error, "ignoring unparseable ModifiedTime");
            error
        })
        .ok()
}

fn unexpected_eof(element: &'static str) -> PlanError {
    PlanError::Io(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("document ended inside <{element}>"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{sections, PlanWriter};
    use codesync_core::CopyEntry;

    #[test]
    fn missing_root_is_fatal() {
        let error = parse("<NotAPlan></NotAPlan>").expect_err("should fail");
        assert!(matches!(error, PlanError::MissingRoot));
    }

    #[test]
    fn empty_document_is_missing_root() {
        let error = parse("").expect_err("should fail");
        assert!(matches!(error, PlanError::MissingRoot));
    }

    #[test]
    fn missing_directories_are_fatal() {
        let error = parse("<CodeSync></CodeSync>").expect_err("should fail");
        assert!(matches!(
            error,
            PlanError::MissingDirectory {
                element: "SourceDirectory"
            }
        ));

        let error = parse(
            "<CodeSync><SourceDirectory>/s</SourceDirectory></CodeSync>",
        )
        .expect_err("should fail");
        assert!(matches!(
            error,
            PlanError::MissingDirectory {
                element: "DestDirectory"
            }
        ));
    }

    #[test]
    fn parses_directories_and_entries() {
        let plan = parse(
            r#"<CodeSync>
  <SourceDirectory>/s</SourceDirectory>
  <DestDirectory>/d</DestDirectory>
  <Copy>
    <Source>a.txt</Source>
    <Destination>b/a.txt</Destination>
  </Copy>
  <Ignore>
    <Source>skip.txt</Source>
  </Ignore>
  <Ignore>
    <Destination>orphan.txt</Destination>
  </Ignore>
</CodeSync>"#,
        )
        .expect("parse");

        assert_eq!(plan.source_dir(), Path::new("/s"));
        assert_eq!(plan.dest_dir(), Path::new("/d"));
        let copies: Vec<CopyEntry> = plan.files_to_copy().collect();
        assert_eq!(
            copies,
            vec![CopyEntry::new("a.txt".into(), "b/a.txt".into())]
        );
        assert_eq!(plan.ignore_source_entries().count(), 1);
        assert_eq!(plan.ignore_dest_entries().count(), 1);
    }

    #[test]
    fn copy_with_one_side_is_partial() {
        let plan = parse(
            r#"<CodeSync>
  <SourceDirectory>/s</SourceDirectory>
  <DestDirectory>/d</DestDirectory>
  <Copy>
    <Source>half.txt</Source>
  </Copy>
  <Copy>
    <Source>empty.txt</Source>
    <Destination></Destination>
  </Copy>
  <Copy/>
</CodeSync>"#,
        )
        .expect("parse");
        assert_eq!(plan.files_to_copy().count(), 0);
        assert_eq!(plan.partial_entries().count(), 3);
    }

    #[test]
    fn candidate_hints_are_not_read_back() {
        let plan = parse(
            r#"<CodeSync>
  <SourceDirectory>/s</SourceDirectory>
  <DestDirectory>/d</DestDirectory>
  <Ignore>
    <Source>src/ui/Button.cs</Source>
    <!-- <Destination>app/ui/Button.cs</Destination> -->
    <!-- <Destination>tests/Button.cs</Destination> -->
  </Ignore>
</CodeSync>"#,
        )
        .expect("parse");
        assert_eq!(plan.ignore_source_entries().count(), 1);
        assert_eq!(plan.ignore_dest_entries().count(), 0);
    }

    #[test]
    fn modified_time_round_trips() {
        let stamp = OffsetDateTime::from_unix_timestamp(1_700_000_000).expect("timestamp");
        let mut writer = PlanWriter::new(Vec::new());
        writer.begin("/s", "/d", Some(stamp)).expect("begin");
        let xml = String::from_utf8(writer.finish().expect("finish")).expect("utf8");

        let plan = parse(&xml).expect("parse");
        assert_eq!(plan.modified_time(), Some(stamp));
    }

    #[test]
    fn unparseable_modified_time_is_ignored() {
        let plan = parse(
            r#"<CodeSync>
  <SourceDirectory>/s</SourceDirectory>
  <DestDirectory>/d</DestDirectory>
  <ModifiedTime>yesterday</ModifiedTime>
</CodeSync>"#,
        )
        .expect("parse");
        assert!(plan.modified_time().is_none());
    }

    #[test]
    fn write_then_read_preserves_entry_sets() {
        let mut writer = PlanWriter::new(Vec::new());
        writer.begin("/s", "/d", None).expect("begin");
        writer.section(sections::CURRENT_MATCHES).expect("section");
        writer
            .copy(&CopyEntry::new("kept/a.txt".into(), "a.txt".into()))
            .expect("copy");
        writer.section(sections::AMBIGUOUS).expect("section");
        writer
            .ambiguous(&"two.txt".into(), &["x/two.txt".into(), "y/two.txt".into()])
            .expect("ambiguous");
        writer.section(sections::SOURCE_ORPHANS).expect("section");
        writer.ignore_source(&"alone.txt".into()).expect("ignore");
        writer.section(sections::DEST_ORPHANS).expect("section");
        writer.orphan_dest(&"stray.txt".into()).expect("orphan");
        let xml = String::from_utf8(writer.finish().expect("finish")).expect("utf8");

        let plan = parse(&xml).expect("parse");
        let copies: Vec<CopyEntry> = plan.files_to_copy().collect();
        assert_eq!(
            copies,
            vec![CopyEntry::new("kept/a.txt".into(), "a.txt".into())]
        );
        let ignored: Vec<&str> = plan
            .ignore_source_entries()
            .map(RelativePath::as_str)
            .collect();
        assert_eq!(ignored, vec!["two.txt", "alone.txt"]);
        // Destination orphans are comments, invisible to the reader.
        assert_eq!(plan.ignore_dest_entries().count(), 0);
    }
}
