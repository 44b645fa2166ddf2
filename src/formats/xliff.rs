/*!
 * XLIFF 1.2 / 2.x adapter.
 *
 * Parsing keeps the whole XML tree as the document envelope. Saving clones
 * that tree and only touches the `target` content of units whose translation
 * changed, so declarations, comments, attributes and every element the model
 * does not know about are written back as they were read.
 *
 * Layout differences between versions:
 * - 1.2: `xliff/file/body/(group/)*trans-unit/{source,target}`
 * - 2.x: `xliff/file/(group/)*unit/segment/{source,target}`
 */

use std::collections::{HashMap, HashSet};

use crate::errors::{ParseError, SerializeError};
use crate::formats::xml::{XmlDocument, XmlElement, XmlNode};
use crate::formats::{decode_text, Envelope, FormatKind, ParsedDocument, SerializationWarning, Serialized};
use crate::markup::{extract, MarkupNode};
use crate::segment::{Segment, SegmentModel};

const FORMAT: &str = "XLIFF";

/// Structural flavour of an XLIFF document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XliffVersion {
    V1,
    V2,
}

impl XliffVersion {
    /// Read the version from the root element, defaulting to 1.2
    pub fn detect(root: &XmlElement) -> Self {
        let declared = root.attribute("version").unwrap_or_default();
        let namespace = root.attribute("xmlns").unwrap_or_default();
        if declared.trim().starts_with('2') || namespace.contains("xliff:document:2") {
            XliffVersion::V2
        } else {
            XliffVersion::V1
        }
    }

    fn unit_tag(&self) -> &'static str {
        match self {
            XliffVersion::V1 => "trans-unit",
            XliffVersion::V2 => "unit",
        }
    }
}

pub fn parse(source: &[u8], target: Option<&[u8]>) -> Result<ParsedDocument, ParseError> {
    let document = parse_document(source)?;
    let mut segments = read_segments(&document)?;

    let mut seen = HashSet::with_capacity(segments.len());
    for segment in &segments {
        if !seen.insert(segment.key.as_str()) {
            return Err(ParseError::DuplicateKey {
                format: FORMAT,
                key: segment.key.clone(),
            });
        }
    }

    if let Some(bytes) = target {
        let target_document = parse_document(bytes)?;
        let translations: HashMap<String, String> = read_segments(&target_document)?
            .into_iter()
            .filter(|s| !s.translation.is_empty())
            .map(|s| (s.key, s.translation))
            .collect();
        for segment in segments.iter_mut() {
            if let Some(translation) = translations.get(&segment.key) {
                segment.translation = translation.clone();
            }
        }
    }

    log::debug!("XLIFF document with {} units", segments.len());
    Ok(ParsedDocument {
        model: SegmentModel::from_segments(segments),
        envelope: Some(Envelope::Xliff(document)),
    })
}

/// Write the model back into a clone of the envelope
pub fn serialize(model: &SegmentModel, envelope: &XmlDocument) -> Result<Serialized, SerializeError> {
    let mut document = envelope.clone();
    let root = document.root_mut().ok_or(SerializeError::MissingEnvelope(FORMAT))?;
    let version = XliffVersion::detect(root);

    let mut warnings = Vec::new();
    for_each_unit_mut(root, version.unit_tag(), &mut |unit| {
        let Some(key) = unit.attribute("id") else {
            return;
        };
        let Some(segment) = model.find(&key) else {
            return;
        };
        if patch_unit(unit, &segment.translation, version) {
            let source = MarkupNode::from_elements(content_elements(unit, "source", version));
            if source.has_inline_markup() {
                log::warn!("Inline markup of unit '{}' written as plain text", key);
                warnings.push(SerializationWarning::InlineMarkupFlattened { key });
            }
        }
    });

    Ok(Serialized {
        bytes: document.to_bytes()?,
        warnings,
    })
}

fn parse_document(bytes: &[u8]) -> Result<XmlDocument, ParseError> {
    let text = decode_text(bytes, FormatKind::Xliff)?;
    XmlDocument::parse(text).map_err(malformed)
}

fn malformed(reason: impl Into<String>) -> ParseError {
    ParseError::Malformed {
        format: FORMAT,
        reason: reason.into(),
    }
}

fn read_segments(document: &XmlDocument) -> Result<Vec<Segment>, ParseError> {
    let root = document.root().ok_or_else(|| malformed("document has no root element"))?;
    if root.local_name() != "xliff" {
        return Err(malformed(format!("expected root <xliff>, found <{}>", root.name)));
    }

    let version = XliffVersion::detect(root);
    let files: Vec<&XmlElement> = root.children_named("file").collect();
    if files.is_empty() {
        return Err(malformed("no <file> element"));
    }
    if version == XliffVersion::V1 {
        if let Some(file) = files.iter().find(|f| f.first_child_named("body").is_none()) {
            let name = file.attribute("original").unwrap_or_default();
            return Err(malformed(format!("<file> '{}' has no <body>", name)));
        }
    }

    let mut units = Vec::new();
    collect_units(root, version.unit_tag(), &mut units);
    if units.is_empty() {
        return Err(ParseError::NoUnits);
    }

    units
        .into_iter()
        .map(|unit| {
            let key = unit
                .attribute("id")
                .ok_or_else(|| malformed(format!("<{}> without id attribute", unit.name)))?;
            let original = extract(&MarkupNode::from_elements(content_elements(unit, "source", version)));
            let targets = content_elements(unit, "target", version);
            let translation = if targets.is_empty() {
                String::new()
            } else {
                extract(&MarkupNode::from_elements(targets))
            };
            Ok(Segment::new(key, original, translation))
        })
        .collect()
}

fn is_container(local_name: &str) -> bool {
    matches!(local_name, "file" | "body" | "group")
}

fn collect_units<'a>(element: &'a XmlElement, unit_tag: &str, out: &mut Vec<&'a XmlElement>) {
    for child in element.child_elements() {
        let name = child.local_name();
        if name == unit_tag {
            out.push(child);
        } else if is_container(name) {
            collect_units(child, unit_tag, out);
        }
    }
}

fn for_each_unit_mut(element: &mut XmlElement, unit_tag: &str, f: &mut dyn FnMut(&mut XmlElement)) {
    for child in element.child_elements_mut() {
        if child.local_name() == unit_tag {
            f(child);
        } else if is_container(child.local_name()) {
            for_each_unit_mut(child, unit_tag, f);
        }
    }
}

// `source` or `target` elements of a unit, in document order
fn content_elements<'a>(unit: &'a XmlElement, name: &'a str, version: XliffVersion) -> Vec<&'a XmlElement> {
    match version {
        XliffVersion::V1 => unit.children_named(name).collect(),
        XliffVersion::V2 => unit
            .children_named("segment")
            .flat_map(|segment| segment.children_named(name))
            .collect(),
    }
}

/// Rewrite the unit's first target when the translation differs. In XLIFF
/// 2.x the whole translation goes into the first `segment` and the targets of
/// later segments are removed.
///
/// Returns whether the tree was changed.
fn patch_unit(unit: &mut XmlElement, translation: &str, version: XliffVersion) -> bool {
    let targets = content_elements(unit, "target", version);
    let unchanged = if targets.is_empty() {
        translation.is_empty()
    } else {
        extract(&MarkupNode::from_elements(targets)) == translation
    };
    if unchanged {
        return false;
    }

    match version {
        XliffVersion::V1 => write_target(unit, translation),
        XliffVersion::V2 => {
            let mut segments = unit.child_elements_mut().filter(|e| e.local_name() == "segment");
            let Some(first) = segments.next() else {
                return false;
            };
            for later in segments {
                later
                    .children
                    .retain(|node| !matches!(node, XmlNode::Element(e) if e.local_name() == "target"));
            }
            write_target(first, translation);
        }
    }
    true
}

fn write_target(container: &mut XmlElement, text: &str) {
    if let Some(target) = container.child_elements_mut().find(|e| e.local_name() == "target") {
        target.set_text(text);
        return;
    }

    let last_source = container.children.iter().rposition(|node| match node {
        XmlNode::Element(e) => e.local_name() == "source",
        _ => false,
    });
    let name = match last_source.and_then(|i| match &container.children[i] {
        XmlNode::Element(source) => source.name.rsplit_once(':').map(|(prefix, _)| prefix.to_string()),
        _ => None,
    }) {
        Some(prefix) => format!("{}:target", prefix),
        None => "target".to_string(),
    };

    let mut target = XmlElement::new(name);
    target.set_text(text);
    let position = last_source.map(|i| i + 1).unwrap_or(container.children.len());
    container.children.insert(position, XmlNode::Element(target));
}
