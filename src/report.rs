//! Cobertura XML output.

use std::io::Write;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::config::Config;
use crate::error::{ConvertError, Result};
use crate::model::*;

/// Declaration and DOCTYPE written ahead of the root element.
pub const HEADER: &str = "<?xml version=\"1.0\" ?><!DOCTYPE coverage SYSTEM \
                          'http://cobertura.sourceforge.net/xml/coverage-03.dtd'>";

/// Cobertura schema version reported in the root element.
pub const COBERTURA_VERSION: &str = "3.7.1";

/// Move a class filename from the source directory to the presentation
/// directory (`out_src_path`).
pub fn rewrite_filename(filename: &str, config: &Config) -> String {
    let new_path: PathBuf = if config.dialect.keeps_relative_paths() {
        let abs = config.resolve(filename);
        let rel = pathdiff::diff_paths(&abs, config.abs_source_path())
            .unwrap_or_else(|| PathBuf::from(filename));
        config.out_src_path.join(rel)
    } else {
        let base = Path::new(filename)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(filename));
        config.out_src_path.join(base)
    };
    new_path.to_string_lossy().into_owned()
}

struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn event(&mut self, event: Event<'_>) -> Result<()> {
        let position = self.writer.get_ref().len();
        self.writer
            .write_event(event)
            .map_err(|source| ConvertError::Xml { source, position })
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut elem = BytesStart::new(name);
        for &attr in attrs {
            elem.push_attribute(attr);
        }
        self.event(Event::Start(elem))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut elem = BytesStart::new(name);
        for &attr in attrs {
            elem.push_attribute(attr);
        }
        self.event(Event::Empty(elem))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn lines<'a>(&mut self, lines: impl Iterator<Item = &'a LineEntry>) -> Result<()> {
        let mut lines = lines.peekable();
        if lines.peek().is_none() {
            return self.empty("lines", &[]);
        }
        self.start("lines", &[])?;
        for line in lines {
            let hits = line.hits.to_string();
            let number = line.number.to_string();
            self.empty("line", &[("hits", hits.as_str()), ("number", number.as_str())])?;
        }
        self.end("lines")
    }

    fn method(&mut self, method: &MethodEntry) -> Result<()> {
        let rate = method.tally.rate_attr();
        self.start(
            "method",
            &[
                ("branch-rate", rate.as_str()),
                ("line-rate", rate.as_str()),
                ("name", method.name.as_str()),
                ("signature", ""),
            ],
        )?;
        self.lines(method.lines.iter())?;
        self.end("method")
    }

    fn class(&mut self, class: &ClassEntry) -> Result<()> {
        let rate = class.tally.rate_attr();
        self.start(
            "class",
            &[
                ("branch-rate", rate.as_str()),
                ("complexity", "0"),
                ("filename", class.filename.as_str()),
                ("line-rate", rate.as_str()),
                ("name", class.name.as_str()),
            ],
        )?;
        if class.methods.is_empty() {
            self.empty("methods", &[])?;
        } else {
            self.start("methods", &[])?;
            for method in &class.methods {
                self.method(method)?;
            }
            self.end("methods")?;
        }
        self.lines(class.lines())?;
        self.end("class")
    }
}

/// Render the report as a complete Cobertura document.
pub fn to_xml(report: &CoverageReport) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.write_all(HEADER.as_bytes())?;
    let mut out = XmlOut {
        writer: Writer::new(buf),
    };

    let rate = report.tally.rate_attr();
    let timestamp = report.timestamp.to_string();
    out.start(
        "coverage",
        &[
            ("branch-rate", rate.as_str()),
            ("line-rate", rate.as_str()),
            ("timestamp", timestamp.as_str()),
            ("version", COBERTURA_VERSION),
        ],
    )?;
    out.start("packages", &[])?;
    out.start(
        "package",
        &[("branch-rate", rate.as_str()), ("name", report.package.name.as_str())],
    )?;
    if report.package.classes.is_empty() {
        out.empty("classes", &[])?;
    } else {
        out.start("classes", &[])?;
        for class in &report.package.classes {
            out.class(class)?;
        }
        out.end("classes")?;
    }
    out.end("package")?;
    out.end("packages")?;
    out.end("coverage")?;

    Ok(out.writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;

    fn sample() -> CoverageReport {
        CoverageReport {
            tally: BlockTally::new(1, 2),
            timestamp: 1_700_000_000,
            package: Package {
                name: "proj".into(),
                classes: vec![
                    ClassEntry {
                        name: "src/a.f90".into(),
                        filename: "src/a.f90".into(),
                        tally: BlockTally::new(1, 2),
                        methods: vec![MethodEntry {
                            name: "add".into(),
                            tally: BlockTally::new(1, 2),
                            lines: vec![
                                LineEntry { number: 5, hits: 3 },
                                LineEntry { number: 7, hits: 0 },
                            ],
                        }],
                    },
                    ClassEntry::empty("src/b.f90".into()),
                ],
            },
        }
    }

    #[test]
    fn test_to_xml() {
        let xml = String::from_utf8(to_xml(&sample()).unwrap()).unwrap();
        assert!(xml.starts_with(HEADER));
        assert!(xml.contains(
            r#"<coverage branch-rate="0.5" line-rate="0.5" timestamp="1700000000" version="3.7.1">"#
        ));
        assert!(xml.contains(r#"<package branch-rate="0.5" name="proj">"#));
        assert!(xml.contains(
            r#"<class branch-rate="0.5" complexity="0" filename="src/a.f90" line-rate="0.5" name="src/a.f90">"#
        ));
        assert!(xml.contains(
            r#"<method branch-rate="0.5" line-rate="0.5" name="add" signature=""><lines><line hits="3" number="5"/><line hits="0" number="7"/></lines></method>"#
        ));
        // Class-level roll-up repeats the method lines.
        assert!(xml.contains(
            r#"</methods><lines><line hits="3" number="5"/><line hits="0" number="7"/></lines></class>"#
        ));
        assert!(xml.contains(
            r#"<class branch-rate="0" complexity="0" filename="src/b.f90" line-rate="0" name="src/b.f90"><methods/><lines/></class>"#
        ));
        assert!(xml.ends_with("</coverage>"));
    }

    #[test]
    fn test_attribute_escaping() {
        let mut report = sample();
        report.package.name = "a&b".into();
        let xml = String::from_utf8(to_xml(&report).unwrap()).unwrap();
        assert!(xml.contains(r#"name="a&amp;b""#));
    }

    #[test]
    fn test_rewrite_filename_keeps_subdirectories() {
        let mut config = Config::new("/proj", "src", "obj");
        config.out_src_path = PathBuf::from("alt/src");
        assert_eq!(rewrite_filename("src/sub/a.f90", &config), "alt/src/sub/a.f90");
        assert_eq!(rewrite_filename("src/a.f90", &config), "alt/src/a.f90");
    }

    #[test]
    fn test_rewrite_filename_default_out_path_is_identity() {
        let config = Config::new("/proj", "src", "obj");
        assert_eq!(rewrite_filename("src/sub/a.f90", &config), "src/sub/a.f90");
    }

    #[test]
    fn test_rewrite_filename_basename_only() {
        let mut config = Config::new("/proj", "src", "obj");
        config.dialect = Dialect::Legacy;
        config.out_src_path = PathBuf::from("alt");
        assert_eq!(rewrite_filename("src/sub/a.f90", &config), "alt/a.f90");
    }
}
