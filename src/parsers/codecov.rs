/// Parser for Intel `codecov` XML coverage reports.
///
/// codecov XML structure:
///   <PROJECT name="...">
///     <MODULE name="/abs/path/to/file.f90">
///       <FUNCTION name="file_mp_func_">
///         <BLOCKS covered="1" total="2"/>
///         <BLOCK line="5" ...>
///           <INSTANCE freq="3"/>
///         </BLOCK>
///       </FUNCTION>
///     </MODULE>
///   </PROJECT>
///
/// `BLOCKS` summaries may also appear at other levels; every one of them is
/// counted towards the enclosing module's and the report's tally.
use std::collections::HashMap;
use std::str;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{ConvertError, Result};
use crate::model::*;
use crate::parsers::Parser;

pub struct CodecovParser;

impl Parser for CodecovParser {
    fn parse(&self, input: &[u8]) -> Result<VendorReport> {
        parse_codecov(input)
    }
}

fn parse_codecov(input: &[u8]) -> Result<VendorReport> {
    let mut reader = Reader::from_reader(input);
    reader.trim_text(true);

    let mut report = VendorReport::default();
    let mut buf = Vec::new();

    // Names of the currently open elements, outermost first.
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut current_module: Option<VendorModule> = None;
    let mut current_function: Option<VendorFunction> = None;
    let mut current_block: Option<VendorBlock> = None;

    loop {
        let event = reader.read_event_into(&mut buf);
        let position = reader.buffer_position();
        let is_start_event = matches!(&event, Ok(Event::Start(_)));
        match event {
            Err(source) => return Err(ConvertError::Xml { source, position }),
            Ok(Event::Eof) => break,
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.name().as_ref().to_vec();
                let parent = stack.last().map(|p| p.as_slice());
                let attrs = attr_map(e);

                match (name.as_slice(), parent) {
                    (_, None) => {
                        report.name = attrs.get("name").cloned().unwrap_or_default();
                    }
                    (b"MODULE", Some(_)) if stack.len() == 1 => {
                        current_module = Some(VendorModule {
                            name: attrs
                                .get("name")
                                .cloned()
                                .unwrap_or_else(|| "unknown".to_string()),
                            ..Default::default()
                        });
                    }
                    (b"FUNCTION", Some(b"MODULE")) if current_function.is_none() => {
                        current_function = Some(VendorFunction {
                            name: attrs
                                .get("name")
                                .cloned()
                                .unwrap_or_else(|| "unknown".to_string()),
                            ..Default::default()
                        });
                    }
                    (b"BLOCKS", parent) => {
                        let tally = BlockTally::new(
                            count_attr(&attrs, "covered")?,
                            count_attr(&attrs, "total")?,
                        );
                        report.tally += tally;
                        if let Some(module) = current_module.as_mut() {
                            module.tally += tally;
                        }
                        if parent == Some(b"FUNCTION".as_slice()) {
                            if let Some(function) = current_function.as_mut() {
                                function.blocks.get_or_insert(tally);
                            }
                        }
                    }
                    (b"BLOCK", Some(b"FUNCTION")) if current_function.is_some() => {
                        let line = match attrs.get("line") {
                            Some(l) => Some(l.trim().parse::<u32>().map_err(|_| {
                                ConvertError::Parse(format!("invalid BLOCK line '{l}'"))
                            })?),
                            None => None,
                        };
                        current_block = Some(VendorBlock {
                            line,
                            freqs: Vec::new(),
                        });
                    }
                    (b"INSTANCE", Some(b"BLOCK")) => {
                        if let Some(block) = current_block.as_mut() {
                            block.freqs.push(count_attr(&attrs, "freq")?);
                        }
                    }
                    _ => {}
                }

                if is_start_event {
                    stack.push(name);
                } else {
                    // Self-closing elements never see an End event.
                    close_element(
                        &name,
                        &mut report,
                        &mut current_module,
                        &mut current_function,
                        &mut current_block,
                    );
                }
            }
            Ok(Event::End(_)) => {
                if let Some(name) = stack.pop() {
                    close_element(
                        &name,
                        &mut report,
                        &mut current_module,
                        &mut current_function,
                        &mut current_block,
                    );
                }
            }
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(ConvertError::Parse(format!(
            "unexpected end of document inside <{}>",
            String::from_utf8_lossy(stack.last().map(|n| n.as_slice()).unwrap_or_default())
        )));
    }

    Ok(report)
}

fn close_element(
    name: &[u8],
    report: &mut VendorReport,
    module: &mut Option<VendorModule>,
    function: &mut Option<VendorFunction>,
    block: &mut Option<VendorBlock>,
) {
    match name {
        b"MODULE" => {
            if function.is_none() {
                if let Some(m) = module.take() {
                    report.modules.push(m);
                }
            }
        }
        b"FUNCTION" => {
            if block.is_none() {
                if let (Some(m), Some(f)) = (module.as_mut(), function.take()) {
                    m.functions.push(f);
                }
            }
        }
        b"BLOCK" => {
            if let (Some(f), Some(b)) = (function.as_mut(), block.take()) {
                f.block_list.push(b);
            }
        }
        _ => {}
    }
}

/// Parse a non-negative integer attribute, defaulting to 0 when absent.
fn count_attr(attrs: &HashMap<String, String>, key: &str) -> Result<u64> {
    match attrs.get(key) {
        Some(v) => v
            .trim()
            .parse::<u64>()
            .map_err(|_| ConvertError::Parse(format!("invalid {key} value '{v}'"))),
        None => Ok(0),
    }
}

/// Extract attributes from an XML element into a HashMap.
fn attr_map(e: &BytesStart) -> HashMap<String, String> {
    e.attributes()
        .filter_map(|a| {
            let attr = a.ok()?;
            let key = str::from_utf8(attr.key.local_name().into_inner())
                .ok()?
                .to_string();
            let value = attr.unescape_value().ok()?.to_string();
            Some((key, value))
        })
        .collect()
}
