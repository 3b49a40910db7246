//! ENI document loading and parsing (spec §4.2, §6).
//!
//! The XML is read with [`roxmltree`], a non-owning, read-only tree reader — the "streaming XML
//! reader" the design notes call for in place of the original's property-tree wrapper (spec §9).
//! Parsing happens once, eagerly, at load time: every value this crate needs is pulled out into
//! the plain owned structs in the sibling `master`/`slave`/`pdo`/`process_image`/`cyclic`
//! modules, and the `roxmltree::Document` is dropped once `Document::parse` returns. This keeps
//! the rest of the crate free of tree-lifetime parameters while still satisfying "navigation is
//! lazy, sub-views share the parent's storage" — sharing happens through an `Rc<Document>`
//! instead of through the XML tree itself.

use super::cyclic::Cyclic;
use super::error::EniError;
use super::master::Master;
use super::pdo::{Direction, Pdo, PdoEntry};
use super::process_image::{ProcessImage, ProcessImageVariable};
use super::slave::{Slave, SlaveData};
use roxmltree::Node;
use std::io::Read;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

/// The fully parsed contents of an ENI file. Entirely owned; never borrows from the XML text.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Document {
    pub(crate) master: Master,
    pub(crate) slaves: Vec<SlaveData>,
    pub(crate) process_image: ProcessImage,
    pub(crate) cyclic: Cyclic,
}

/// The root of a loaded ENI document (spec §4.2's `Configuration`).
///
/// Obtained from [`Configuration::from_file`], [`Configuration::from_string`] or
/// [`Configuration::from_stream`]. Cheap to clone (an `Rc` bump).
#[derive(Clone)]
pub struct Configuration {
    doc: Rc<Document>,
}

impl Configuration {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EniError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EniError::Unreadable(format!("{}: {e}", path.display())))?;
        Self::from_string(&text)
    }

    pub fn from_stream(mut reader: impl Read) -> Result<Self, EniError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| EniError::Unreadable(e.to_string()))?;
        Self::from_string(&text)
    }

    pub fn from_string(xml: &str) -> Result<Self, EniError> {
        let tree =
            roxmltree::Document::parse(xml).map_err(|e| EniError::Unreadable(e.to_string()))?;

        let config = tree
            .descendants()
            .find(|n| n.has_tag_name("Config"))
            .ok_or_else(|| EniError::Malformed {
                path: "Config".to_string(),
                reason: "missing root element".to_string(),
            })?;

        let master = parse_master(&config)?;
        let slaves = parse_slaves(&config)?;
        let process_image = parse_process_image(&config)?;
        let cyclic = parse_cyclic(&config)?;

        validate_process_image_size(&process_image)?;

        Ok(Configuration {
            doc: Rc::new(Document {
                master,
                slaves,
                process_image,
                cyclic,
            }),
        })
    }

    pub fn get_master(&self) -> Master {
        self.doc.master.clone()
    }

    pub fn get_cyclic(&self) -> Cyclic {
        self.doc.cyclic
    }

    pub fn get_process_image(&self) -> ProcessImage {
        self.doc.process_image.clone()
    }

    pub fn list_slaves(&self) -> impl Iterator<Item = &str> {
        self.doc.slaves.iter().map(|s| s.name())
    }

    pub fn get_slave(&self, name: &str) -> Option<Slave> {
        let index = self.doc.slaves.iter().position(|s| s.name() == name)?;
        Some(Slave {
            doc: Rc::clone(&self.doc),
            index,
        })
    }

    pub fn slaves(&self) -> impl Iterator<Item = Slave> + '_ {
        (0..self.doc.slaves.len()).map(move |index| Slave {
            doc: Rc::clone(&self.doc),
            index,
        })
    }
}

fn child<'a, 'i>(node: &Node<'a, 'i>, tag: &str) -> Option<Node<'a, 'i>> {
    node.children().find(|n| n.has_tag_name(tag))
}

fn children<'a, 'i>(node: &Node<'a, 'i>, tag: &str) -> impl Iterator<Item = Node<'a, 'i>> {
    node.children()
        .filter(move |n| n.has_tag_name(tag))
        .collect::<Vec<_>>()
        .into_iter()
}

fn required_child<'a, 'i>(
    node: &Node<'a, 'i>,
    tag: &str,
    path: &str,
) -> Result<Node<'a, 'i>, EniError> {
    child(node, tag).ok_or_else(|| EniError::Malformed {
        path: path.to_string(),
        reason: format!("missing <{tag}> element"),
    })
}

fn text(node: &Node, path: &str) -> Result<String, EniError> {
    node.text()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| EniError::Malformed {
            path: path.to_string(),
            reason: "element has no text content".to_string(),
        })
}

fn required_text(node: &Node, tag: &str, path: &str) -> Result<String, EniError> {
    let child_path = format!("{path}.{tag}");
    text(&required_child(node, tag, path)?, &child_path)
}

/// ENI addresses and several numeric attributes are conventionally written as `#x1000`
/// (hexadecimal) as well as plain decimal; accept both.
fn parse_number(raw: &str, path: &str) -> Result<i64, EniError> {
    let raw = raw.trim();
    let parsed = if let Some(hex) = raw.strip_prefix("#x").or_else(|| raw.strip_prefix("0x")) {
        i64::from_str_radix(hex, 16)
    } else {
        raw.parse::<i64>()
    };

    parsed.map_err(|e| EniError::Malformed {
        path: path.to_string(),
        reason: format!("'{raw}' is not a valid integer: {e}"),
    })
}

fn required_number(node: &Node, tag: &str, path: &str) -> Result<i64, EniError> {
    let raw = required_text(node, tag, path)?;
    parse_number(&raw, &format!("{path}.{tag}"))
}

fn optional_number(node: &Node, tag: &str, path: &str) -> Result<Option<i64>, EniError> {
    match child(node, tag) {
        Some(n) => Ok(Some(parse_number(&text(&n, path)?, path)?)),
        None => Ok(None),
    }
}

fn parse_master(config: &Node) -> Result<Master, EniError> {
    let master_node = required_child(config, "Master", "Config")?;
    let name = required_text(&master_node, "Name", "Config.Master")?;
    Ok(Master::new(name))
}

fn parse_slaves(config: &Node) -> Result<Vec<SlaveData>, EniError> {
    let mut slaves = Vec::new();

    for (i, slave_node) in children(config, "Slave").enumerate() {
        let path = format!("Config.Slave[{i}]");
        let info = required_child(&slave_node, "Info", &path)?;
        let info_path = format!("{path}.Info");

        let name = required_text(&info, "Name", &info_path)?;
        let phys_addr = required_number(&info, "PhysAddr", &info_path)? as u16;
        let auto_inc_addr = required_number(&info, "AutoIncAddr", &info_path)? as u16;

        let pdos = match child(&slave_node, "ProcessData") {
            Some(pd) => parse_pdos(&pd, &format!("{path}.ProcessData"))?,
            None => Vec::new(),
        };

        slaves.push(SlaveData {
            name,
            phys_addr,
            auto_inc_addr,
            pdos,
        });
    }

    Ok(slaves)
}

fn parse_pdos(process_data: &Node, path: &str) -> Result<Vec<Pdo>, EniError> {
    let mut pdos = Vec::new();

    for (direction, tag) in [(Direction::Output, "RxPdo"), (Direction::Input, "TxPdo")] {
        for (i, pdo_node) in children(process_data, tag).enumerate() {
            let pdo_path = format!("{path}.{tag}[{i}]");
            pdos.push(parse_pdo(&pdo_node, direction, &pdo_path)?);
        }
    }

    Ok(pdos)
}

fn parse_pdo(pdo_node: &Node, direction: Direction, path: &str) -> Result<Pdo, EniError> {
    let index = required_number(pdo_node, "Index", path)? as u16;
    let name = required_text(pdo_node, "Name", path)?;
    let sm = optional_number(pdo_node, "SmNo", path)?.map(|n| n as u8);
    let fixed = child(pdo_node, "Fixed").is_some();
    let excludes = children(pdo_node, "Excludes")
        .map(|n| parse_number(&text(&n, path).unwrap_or_default(), path))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|n| n as u16)
        .collect();

    let mut entries = Vec::new();
    for (i, entry_node) in children(pdo_node, "Entry").enumerate() {
        let entry_path = format!("{path}.Entry[{i}]");
        entries.push(parse_pdo_entry(&entry_node, &entry_path)?);
    }

    Ok(Pdo {
        direction,
        index,
        name,
        entries,
        sm,
        fixed,
        excludes,
    })
}

fn parse_pdo_entry(entry_node: &Node, path: &str) -> Result<PdoEntry, EniError> {
    Ok(PdoEntry {
        index: required_number(entry_node, "Index", path)? as u16,
        subindex: optional_number(entry_node, "SubIndex", path)?.unwrap_or(0) as u8,
        bit_len: required_number(entry_node, "BitLen", path)? as usize,
        name: required_text(entry_node, "Name", path).unwrap_or_default(),
        data_type: required_text(entry_node, "DataType", path).unwrap_or_default(),
    })
}

fn parse_process_image(config: &Node) -> Result<ProcessImage, EniError> {
    let pi_node = match child(config, "ProcessImage") {
        Some(n) => n,
        None => return Ok(ProcessImage::default()),
    };
    let path = "Config.ProcessImage";

    let mut input_bits = 0;
    let mut output_bits = 0;
    let mut variables = Vec::new();

    if let Some(inputs) = child(&pi_node, "Inputs") {
        input_bits = optional_number(&inputs, "ByteSize", &format!("{path}.Inputs"))?
            .unwrap_or(0) as usize
            * 8;
        parse_process_image_variables(
            &inputs,
            &format!("{path}.Inputs"),
            Direction::Input,
            &mut variables,
        )?;
    }

    if let Some(outputs) = child(&pi_node, "Outputs") {
        output_bits = optional_number(&outputs, "ByteSize", &format!("{path}.Outputs"))?
            .unwrap_or(0) as usize
            * 8;
        parse_process_image_variables(
            &outputs,
            &format!("{path}.Outputs"),
            Direction::Output,
            &mut variables,
        )?;
    }

    Ok(ProcessImage {
        input_bits,
        output_bits,
        variables,
    })
}

fn parse_process_image_variables(
    section: &Node,
    path: &str,
    direction: Direction,
    out: &mut Vec<ProcessImageVariable>,
) -> Result<(), EniError> {
    for (i, var_node) in children(section, "Variable").enumerate() {
        let var_path = format!("{path}.Variable[{i}]");
        let fully_qualified_name = required_text(&var_node, "Name", &var_path)?;
        let (slave_name, pdo_name, entry_name) =
            ProcessImageVariable::classify(&fully_qualified_name);

        out.push(ProcessImageVariable {
            fully_qualified_name,
            slave_name,
            pdo_name,
            entry_name,
            bit_size: required_number(&var_node, "BitSize", &var_path)? as usize,
            bit_offset: required_number(&var_node, "BitOffs", &var_path)? as usize,
            data_type: required_text(&var_node, "DataType", &var_path).unwrap_or_default(),
            direction,
        });
    }

    Ok(())
}

fn parse_cyclic(config: &Node) -> Result<Cyclic, EniError> {
    let cyclic_node = match child(config, "Cyclic") {
        Some(n) => n,
        None => return Ok(Cyclic::new(Duration::from_micros(0))),
    };

    let micros = required_number(&cyclic_node, "CycleTime", "Config.Cyclic")? as u64;
    Ok(Cyclic::new(Duration::from_micros(micros)))
}

fn validate_process_image_size(pi: &ProcessImage) -> Result<(), EniError> {
    for (declared_bits, direction) in [
        (pi.input_bits, Direction::Input),
        (pi.output_bits, Direction::Output),
    ] {
        if declared_bits == 0 {
            continue;
        }

        let computed_bits: usize = pi
            .variables
            .iter()
            .filter(|v| v.direction == direction)
            .map(|v| v.bit_offset + v.bit_size)
            .max()
            .unwrap_or(0);

        if computed_bits > declared_bits {
            return Err(EniError::ProcessImageSizeMismatch {
                declared_bytes: declared_bits / 8,
                computed_bytes: (computed_bits + 7) / 8,
            });
        }
    }

    Ok(())
}
