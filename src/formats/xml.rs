/*!
 * Lossless XML element tree on top of quick-xml events.
 *
 * The tree keeps everything needed to write a document back: the XML
 * declaration, processing instructions, comments, doctype, attribute order
 * and raw attribute values, whitespace text and self-closing tags. It is the
 * envelope the XLIFF adapter clones and patches on save.
 */

use quick_xml::escape::{partial_escape, unescape};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use std::borrow::Cow;

use crate::errors::SerializeError;

// Length of the `xml` target in a declaration body
const DECLARATION_NAME_LEN: usize = 3;

/// One attribute; the value is stored exactly as written (still escaped)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: String,
    raw_value: String,
}

impl XmlAttribute {
    /// Unescaped attribute value
    pub fn value(&self) -> String {
        match unescape(&self.raw_value) {
            Ok(value) => value.into_owned(),
            Err(_) => self.raw_value.clone(),
        }
    }
}

/// Character data kept exactly as written (entities still escaped)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlText {
    raw: String,
}

impl XmlText {
    /// Text node for a plain value; markup characters are escaped
    pub fn new(value: &str) -> Self {
        XmlText {
            raw: partial_escape(value).into_owned(),
        }
    }

    /// Unescaped text
    pub fn value(&self) -> String {
        match unescape(&self.raw) {
            Ok(value) => value.into_owned(),
            Err(_) => self.raw.clone(),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(XmlText),
    CData(String),
    /// Raw comment body
    Comment(String),
    /// Raw processing instruction body, target included
    ProcessingInstruction(String),
    /// Raw declaration body (`xml version="1.0" ...`)
    Declaration(String),
    DocType(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<XmlAttribute>,
    pub children: Vec<XmlNode>,
    pub self_closing: bool,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        XmlElement {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }

    /// Name without namespace prefix
    pub fn local_name(&self) -> &str {
        match self.name.rsplit_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(XmlAttribute::value)
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Direct children with the given local name
    pub fn children_named<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.child_elements().filter(move |e| e.local_name() == local_name)
    }

    pub fn first_child_named(&self, local_name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|e| e.local_name() == local_name)
    }

    pub fn has_child_elements(&self) -> bool {
        self.child_elements().next().is_some()
    }

    /// Concatenation of the direct text and CDATA children
    pub fn direct_text(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            match node {
                XmlNode::Text(t) => text.push_str(&t.value()),
                XmlNode::CData(t) => text.push_str(t),
                _ => {}
            }
        }
        text
    }

    /// Replace all content with a single text node
    pub fn set_text(&mut self, text: &str) {
        self.children = vec![XmlNode::Text(XmlText::new(text))];
        self.self_closing = false;
    }
}

/// A parsed XML document: prolog nodes, the root element and trailing nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub nodes: Vec<XmlNode>,
}

impl XmlDocument {
    /// Parse a document, failing on any syntax error or unbalanced tag
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(false);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut nodes: Vec<XmlNode> = Vec::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|e| format!("XML syntax error at byte {}: {}", reader.buffer_position(), e))?;

            match event {
                Event::Start(start) => stack.push(element_from_start(&start, false)?),
                Event::Empty(start) => {
                    let element = element_from_start(&start, true)?;
                    push_node(&mut stack, &mut nodes, XmlNode::Element(element));
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| "closing tag without matching opening tag".to_string())?;
                    push_node(&mut stack, &mut nodes, XmlNode::Element(element));
                }
                Event::Text(text) => {
                    text.unescape()
                        .map_err(|e| format!("invalid character data: {}", e))?;
                    let raw = utf8(&text)?;
                    push_node(&mut stack, &mut nodes, XmlNode::Text(XmlText { raw }));
                }
                Event::CData(data) => {
                    let value = utf8(&data)?;
                    push_node(&mut stack, &mut nodes, XmlNode::CData(value));
                }
                Event::Comment(comment) => {
                    let value = utf8(&comment)?;
                    push_node(&mut stack, &mut nodes, XmlNode::Comment(value));
                }
                Event::PI(pi) => {
                    let value = utf8(&pi)?;
                    push_node(&mut stack, &mut nodes, XmlNode::ProcessingInstruction(value));
                }
                Event::DocType(doctype) => {
                    let value = utf8(&doctype)?;
                    push_node(&mut stack, &mut nodes, XmlNode::DocType(value));
                }
                Event::Decl(decl) => {
                    decl.version()
                        .map_err(|e| format!("invalid XML declaration: {}", e))?;
                    let raw = utf8(&decl)?;
                    push_node(&mut stack, &mut nodes, XmlNode::Declaration(raw));
                }
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.last() {
            return Err(format!("unclosed element <{}>", open.name));
        }

        Ok(XmlDocument { nodes })
    }

    pub fn root(&self) -> Option<&XmlElement> {
        self.nodes.iter().find_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn root_mut(&mut self) -> Option<&mut XmlElement> {
        self.nodes.iter_mut().find_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Write the document back to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializeError> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.nodes {
            write_node(&mut writer, node)?;
        }
        Ok(writer.into_inner())
    }
}

fn utf8(bytes: &[u8]) -> Result<String, String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| format!("invalid UTF-8 in markup: {}", e))
}

fn push_node(stack: &mut [XmlElement], nodes: &mut Vec<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => nodes.push(node),
    }
}

fn element_from_start(start: &BytesStart, self_closing: bool) -> Result<XmlElement, String> {
    let name = utf8(start.name().as_ref())?;
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| format!("invalid attribute on <{}>: {}", name, e))?;
        attributes.push(XmlAttribute {
            name: utf8(attribute.key.as_ref())?,
            raw_value: utf8(&attribute.value)?,
        });
    }
    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
        self_closing,
    })
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<(), SerializeError> {
    let result = match node {
        XmlNode::Element(element) => return write_element(writer, element),
        XmlNode::Text(text) => writer.write_event(Event::Text(BytesText::from_escaped(text.raw()))),
        XmlNode::CData(data) => writer.write_event(Event::CData(BytesCData::new(data.as_str()))),
        XmlNode::Comment(comment) => writer.write_event(Event::Comment(BytesText::from_escaped(comment.as_str()))),
        XmlNode::ProcessingInstruction(pi) => writer.write_event(Event::PI(BytesPI::new(pi.as_str()))),
        XmlNode::DocType(doctype) => writer.write_event(Event::DocType(BytesText::from_escaped(doctype.as_str()))),
        XmlNode::Declaration(decl) => writer.write_event(Event::Decl(BytesDecl::from_start(
            BytesStart::from_content(decl.as_str(), DECLARATION_NAME_LEN),
        ))),
    };
    result.map_err(|e| SerializeError::Xml(e.to_string()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<(), SerializeError> {
    let mut start = BytesStart::new(element.name.as_str());
    for attribute in &element.attributes {
        start.push_attribute(Attribute {
            key: QName(attribute.name.as_bytes()),
            value: Cow::Borrowed(attribute.raw_value.as_bytes()),
        });
    }

    if element.self_closing && element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| SerializeError::Xml(e.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| SerializeError::Xml(e.to_string()))?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| SerializeError::Xml(e.to_string()))
}
