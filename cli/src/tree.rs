use std::path::PathBuf;

use buf::ByteBuffer;
use clap::Args;
use der::{Class, ObjectIdentifier};
use loader::{Asn1Tree, NodeId};
use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::output::{OutputFormat, write_structured};
use crate::utils::load_certificate;

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the certificate (PEM or DER). If not specified, reads from stdin
    file: Option<PathBuf>,

    /// Expand constructed values this many levels below the top. Unlimited by default
    #[arg(short, long)]
    depth: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,
}

/// Indentation stops growing past this depth so deep nesting keeps lines short.
const MAX_INDENT: usize = 32;

/// One decoded node in structured output. Entries are listed in pre-order
/// and refer to their parent by `id`, so arbitrarily deep trees stay flat.
#[derive(Serialize)]
struct Entry {
    id: usize,
    parent: Option<usize>,
    offset: usize,
    depth: usize,
    header_length: usize,
    length: usize,
    indefinite: bool,
    class: Class,
    constructed: bool,
    tag: u32,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    oid: Option<ObjectIdentifier>,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let mut certificate = load_certificate(config.file.as_deref())?;
    let buffer = certificate.buffer_mut();
    let mut tree = Asn1Tree::outline(buffer)?;
    tree.expand_to_depth(buffer, config.depth.unwrap_or(usize::MAX))?;
    let buffer = &*buffer;

    let walked = tree.walk();
    if let OutputFormat::Text = config.output {
        for (id, depth) in walked {
            println!("{}", line(&tree, buffer, id, depth));
        }
        return Ok(());
    }

    let entries: Vec<Entry> = walked
        .into_iter()
        .map(|(id, depth)| entry(&tree, buffer, id, depth))
        .collect();
    write_structured(&entries, config.output)?;
    Ok(())
}

fn object_identifier(tree: &Asn1Tree, buffer: &ByteBuffer, id: NodeId) -> Option<ObjectIdentifier> {
    match tree.object_identifier(buffer, id) {
        Ok(oid) => oid,
        Err(e) => {
            warn!(offset = tree.node(id).offset(), "cannot decode OBJECT IDENTIFIER: {e}");
            None
        }
    }
}

fn entry(tree: &Asn1Tree, buffer: &ByteBuffer, id: NodeId, depth: usize) -> Entry {
    let node = tree.node(id);
    let header = node.header();
    Entry {
        id: id.index(),
        parent: node.parent().map(|parent| parent.index()),
        offset: node.offset(),
        depth,
        header_length: header.header_length(),
        length: node.value_length(),
        indefinite: header.is_indefinite(),
        class: header.class(),
        constructed: header.constructed(),
        tag: header.tag(),
        name: header.label(),
        oid: object_identifier(tree, buffer, id),
    }
}

/// One line in the style of `openssl asn1parse`:
/// `  474:d=1  hl=2 l=  10 cons: SEQUENCE`
fn line(tree: &Asn1Tree, buffer: &ByteBuffer, id: NodeId, depth: usize) -> String {
    let node = tree.node(id);
    let header = node.header();
    let length = if header.is_indefinite() {
        "inf".to_string()
    } else {
        node.value_length().to_string()
    };
    let mut line = format!(
        "{:>5}:d={:<2} hl={} l={:>4} {}: {}{}",
        node.offset(),
        depth,
        header.header_length(),
        length,
        if header.constructed() { "cons" } else { "prim" },
        "  ".repeat(depth.min(MAX_INDENT)),
        header.label(),
    );
    if let Some(oid) = object_identifier(tree, buffer, id) {
        line.push_str(&format!(" :{oid}"));
    }
    line
}
