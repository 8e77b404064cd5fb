//! Plan serialization.
//!
//! The writer produces every byte explicitly: element events go through
//! `quick-xml`, while line breaks and indentation are raw text events. The
//! blank lines around section headers are therefore part of the write
//! sequence itself, which keeps the emitted document stable no matter which
//! sections a run produces.

use std::io::{self, Write};

use codesync_core::{CopyEntry, PartialEntry, RelativePath};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::PlanError;

const ROOT: &str = "CodeSync";
const NEWLINE: &str = "\n";
const INDENT: &str = "  ";

/// Streaming writer for a plan document.
///
/// Call [`begin`](Self::begin) first, then any number of section and entry
/// writes, then [`finish`](Self::finish). The writer owns the output stream
/// and hands it back on finish; dropping the writer early abandons the
/// partially written document.
pub struct PlanWriter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> PlanWriter<W> {
    /// Wraps an output stream.
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new(inner),
        }
    }

    /// Writes the XML declaration, the root element, the two directory
    /// elements, and the optional generation timestamp.
    pub fn begin(
        &mut self,
        source_dir: &str,
        dest_dir: &str,
        modified_time: Option<OffsetDateTime>,
    ) -> Result<(), PlanError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.raw(NEWLINE)?;
        self.writer
            .write_event(Event::Start(BytesStart::new(ROOT)))?;
        self.text_element(1, "SourceDirectory", source_dir)?;
        self.text_element(1, "DestDirectory", dest_dir)?;
        if let Some(stamp) = modified_time {
            let rendered = stamp
                .format(&Rfc3339)
                .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;
            self.text_element(1, "ModifiedTime", &rendered)?;
        }
        Ok(())
    }

    /// Writes a section header: a block comment with a blank line before and
    /// after, both produced as raw newlines.
    pub fn section(&mut self, header: &str) -> Result<(), PlanError> {
        self.raw(NEWLINE)?;
        self.line(1)?;
        self.comment_text(header)?;
        self.raw(NEWLINE)?;
        Ok(())
    }

    /// Writes a complete `Copy` entry.
    pub fn copy(&mut self, entry: &CopyEntry) -> Result<(), PlanError> {
        self.line(1)?;
        self.writer
            .write_event(Event::Start(BytesStart::new("Copy")))?;
        self.text_element(2, "Source", entry.source.as_str())?;
        self.text_element(2, "Destination", entry.dest.as_str())?;
        self.line(1)?;
        self.writer.write_event(Event::End(BytesEnd::new("Copy")))?;
        Ok(())
    }

    /// Writes a `Copy` entry that is missing one side.
    pub fn partial(&mut self, entry: &PartialEntry) -> Result<(), PlanError> {
        self.line(1)?;
        self.writer
            .write_event(Event::Start(BytesStart::new("Copy")))?;
        if let Some(source) = &entry.source {
            self.text_element(2, "Source", source.as_str())?;
        }
        if let Some(dest) = &entry.dest {
            self.text_element(2, "Destination", dest.as_str())?;
        }
        self.line(1)?;
        self.writer.write_event(Event::End(BytesEnd::new("Copy")))?;
        Ok(())
    }

    /// Writes an `Ignore` entry for a source-side file.
    pub fn ignore_source(&mut self, path: &RelativePath) -> Result<(), PlanError> {
        self.ignore_one("Source", path)
    }

    /// Writes an `Ignore` entry for a destination-side file.
    pub fn ignore_dest(&mut self, path: &RelativePath) -> Result<(), PlanError> {
        self.ignore_one("Destination", path)
    }

    /// Writes an ambiguous source as an `Ignore` entry whose candidate
    /// destinations appear as comment hints inside the element. The hints are
    /// not read back; they exist for the person editing the plan.
    pub fn ambiguous(
        &mut self,
        source: &RelativePath,
        candidates: &[RelativePath],
    ) -> Result<(), PlanError> {
        self.line(1)?;
        self.writer
            .write_event(Event::Start(BytesStart::new("Ignore")))?;
        self.text_element(2, "Source", source.as_str())?;
        for candidate in candidates {
            self.line(2)?;
            self.comment_text(&format!(
                "<Destination>{}</Destination>",
                candidate.as_str()
            ))?;
        }
        self.line(1)?;
        self.writer
            .write_event(Event::End(BytesEnd::new("Ignore")))?;
        Ok(())
    }

    /// Writes a destination orphan as a comment-only line the user can
    /// uncomment into a real `Ignore` entry.
    pub fn orphan_dest(&mut self, path: &RelativePath) -> Result<(), PlanError> {
        self.line(1)?;
        self.comment_text(&format!(
            "<Ignore><Destination>{}</Destination></Ignore>",
            path.as_str()
        ))
    }

    /// Closes the root element and returns the output stream.
    pub fn finish(mut self) -> Result<W, PlanError> {
        self.raw(NEWLINE)?;
        self.writer.write_event(Event::End(BytesEnd::new(ROOT)))?;
        self.raw(NEWLINE)?;
        Ok(self.writer.into_inner())
    }

    fn ignore_one(&mut self, side: &str, path: &RelativePath) -> Result<(), PlanError> {
        self.line(1)?;
        self.writer
            .write_event(Event::Start(BytesStart::new("Ignore")))?;
        self.text_element(2, side, path.as_str())?;
        self.line(1)?;
        self.writer
            .write_event(Event::End(BytesEnd::new("Ignore")))?;
        Ok(())
    }

    fn text_element(&mut self, depth: usize, name: &str, text: &str) -> Result<(), PlanError> {
        self.line(depth)?;
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn comment_text(&mut self, text: &str) -> Result<(), PlanError> {
        let padded = format!(" {text} ");
        self.writer
            .write_event(Event::Comment(BytesText::from_escaped(padded)))?;
        Ok(())
    }

    fn line(&mut self, depth: usize) -> Result<(), PlanError> {
        let mut prefix = String::from(NEWLINE);
        for _ in 0..depth {
            prefix.push_str(INDENT);
        }
        self.raw(&prefix)
    }

    fn raw(&mut self, text: &str) -> Result<(), PlanError> {
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(text)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections;

    fn render<F>(build: F) -> String
    where
        F: FnOnce(&mut PlanWriter<Vec<u8>>),
    {
        let mut writer = PlanWriter::new(Vec::new());
        build(&mut writer);
        String::from_utf8(writer.finish().expect("finish")).expect("utf8")
    }

    #[test]
    fn begin_writes_declaration_and_directories() {
        let xml = render(|w| {
            w.begin("/src", "/dst", None).expect("begin");
        });
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<CodeSync>"));
        assert!(xml.contains("\n  <SourceDirectory>/src</SourceDirectory>"));
        assert!(xml.contains("\n  <DestDirectory>/dst</DestDirectory>"));
        assert!(xml.ends_with("\n</CodeSync>\n"));
    }

    #[test]
    fn section_headers_are_surrounded_by_blank_lines() {
        let xml = render(|w| {
            w.begin("/src", "/dst", None).expect("begin");
            w.section(sections::CURRENT_MATCHES).expect("section");
            w.copy(&CopyEntry::new("a.txt".into(), "a.txt".into()))
                .expect("copy");
        });
        let expected = format!("\n\n  <!-- {} -->\n\n  <Copy>", sections::CURRENT_MATCHES);
        assert!(xml.contains(&expected), "got: {xml}");
    }

    #[test]
    fn copy_entry_layout_is_two_space_indented() {
        let xml = render(|w| {
            w.begin("/src", "/dst", None).expect("begin");
            w.copy(&CopyEntry::new("a/b.txt".into(), "c/b.txt".into()))
                .expect("copy");
        });
        assert!(xml.contains(
            "\n  <Copy>\n    <Source>a/b.txt</Source>\n    <Destination>c/b.txt</Destination>\n  </Copy>"
        ));
    }

    #[test]
    fn ambiguous_entry_lists_candidates_as_comments() {
        let xml = render(|w| {
            w.begin("/src", "/dst", None).expect("begin");
            w.ambiguous(
                &"src/ui/Button.cs".into(),
                &["app/ui/Button.cs".into(), "tests/Button.cs".into()],
            )
            .expect("ambiguous");
        });
        assert!(xml.contains("<Source>src/ui/Button.cs</Source>"));
        assert!(xml.contains("<!-- <Destination>app/ui/Button.cs</Destination> -->"));
        assert!(xml.contains("<!-- <Destination>tests/Button.cs</Destination> -->"));
    }

    #[test]
    fn path_text_is_escaped() {
        let xml = render(|w| {
            w.begin("/src", "/dst", None).expect("begin");
            w.copy(&CopyEntry::new("a&b.txt".into(), "a<b.txt".into()))
                .expect("copy");
        });
        assert!(xml.contains("<Source>a&amp;b.txt</Source>"));
        assert!(xml.contains("<Destination>a&lt;b.txt</Destination>"));
    }

    #[test]
    fn modified_time_is_rfc3339() {
        let stamp = OffsetDateTime::from_unix_timestamp(1_700_000_000).expect("timestamp");
        let xml = render(|w| {
            w.begin("/src", "/dst", Some(stamp)).expect("begin");
        });
        assert!(xml.contains("<ModifiedTime>2023-11-14T22:13:20Z</ModifiedTime>"));
    }
}
