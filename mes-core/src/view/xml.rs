//! Structural stage of view parsing.
//!
//! Turns the quick-xml event stream into a small owned element tree. Nothing
//! here knows about components or schemas; malformed XML (unbalanced tags,
//! bad attributes, several roots) is rejected as `MalformedDocument`.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ViewError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    /// Byte offset of the start tag, for error reporting.
    pub position: usize,
}

impl XmlElement {
    fn from_start(start: &BytesStart<'_>, position: usize) -> Result<Self, ViewError> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| ViewError::malformed(position, e))?;
            let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|e| ViewError::malformed(position, e))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            position,
        })
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute that must be present and non-blank.
    pub fn required_attribute(&self, key: &str, path: &str) -> Result<&str, ViewError> {
        match self.optional_attribute(key, path)? {
            Some(value) => Ok(value),
            None => Err(ViewError::MissingAttribute {
                element: self.name.clone(),
                attribute: key.to_string(),
                path: path.to_string(),
            }),
        }
    }

    /// Attribute that may be absent, but must not be blank when present.
    pub fn optional_attribute(&self, key: &str, path: &str) -> Result<Option<&str>, ViewError> {
        match self.attribute(key) {
            Some(value) if value.trim().is_empty() => Err(ViewError::invalid_attribute(
                path,
                key,
                value,
                "must not be blank",
            )),
            Some(value) => Ok(Some(value.trim())),
            None => Ok(None),
        }
    }

    pub fn boolean_attribute(
        &self,
        key: &str,
        path: &str,
        default: bool,
    ) -> Result<bool, ViewError> {
        match self.optional_attribute(key, path)? {
            None => Ok(default),
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            Some(other) => Err(ViewError::invalid_attribute(
                path,
                key,
                other,
                "expected 'true' or 'false'",
            )),
        }
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |child| child.name == name)
    }
}

/// Read a whole document into its root element.
pub(crate) fn read_document<R: BufRead>(source: R) -> Result<XmlElement, ViewError> {
    let mut reader = Reader::from_reader(source);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut open: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let position = reader.buffer_position() as usize;
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(start)) => open.push(XmlElement::from_start(&start, position)?),
            Ok(Event::Empty(start)) => {
                let element = XmlElement::from_start(&start, position)?;
                attach(&mut open, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = open
                    .pop()
                    .ok_or_else(|| ViewError::malformed(position, "unexpected closing tag"))?;
                attach(&mut open, &mut root, element)?;
            }
            Ok(Event::Eof) => break,
            // Declarations, comments, processing instructions and text carry
            // nothing a view definition needs.
            Ok(_) => {}
            Err(e) => {
                return Err(ViewError::malformed(reader.buffer_position() as usize, e));
            }
        }
        buf.clear();
    }

    if let Some(unclosed) = open.last() {
        return Err(ViewError::malformed(
            unclosed.position,
            format!("element <{}> is never closed", unclosed.name),
        ));
    }
    root.ok_or_else(|| ViewError::malformed(0, "document has no root element"))
}

fn attach(
    open: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), ViewError> {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(ViewError::malformed(
                element.position,
                format!("second root element <{}>", element.name),
            ))
        }
    }
    Ok(())
}
