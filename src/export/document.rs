//! TCX element tree, ordering templates, and XML serialization.
//!
//! Child order inside `Lap`, `Trackpoint` and the `TPX` extension blocks is
//! significant to several importers. Each ordered parent has a template
//! listing its slots; builders hand elements to [`Slots`] in any order and the
//! template decides the emitted order.

use super::types::ExportError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

/// TCX XML namespaces
pub const NS_TCX: &str = "http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2";
pub const NS_ACTIVITY_EXTENSION: &str = "http://www.garmin.com/xmlschemas/ActivityExtension/v2";
pub const NS_PROFILE_EXTENSION: &str = "http://www.garmin.com/xmlschemas/ProfileExtension/v1";
pub const NS_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const SCHEMA_LOCATION: &str = "http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2 http://www.garmin.com/xmlschemas/TrainingCenterDatabasev2.xsd";

/// Root element name.
pub const ROOT: &str = "TrainingCenterDatabase";

/// Whether a slot must be filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// A named position in a parent's child list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub name: &'static str,
    pub presence: Presence,
}

impl Slot {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            presence: Presence::Required,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            presence: Presence::Optional,
        }
    }
}

pub const ACTIVITY_TEMPLATE: &[Slot] = &[Slot::required("Id"), Slot::required("Lap")];

pub const LAP_TEMPLATE: &[Slot] = &[
    Slot::required("TotalTimeSeconds"),
    Slot::required("DistanceMeters"),
    Slot::required("MaximumSpeed"),
    Slot::required("AverageHeartRateBpm"),
    Slot::required("MaximumHeartRateBpm"),
    Slot::required("Calories"),
    Slot::required("Intensity"),
    Slot::required("Track"),
    Slot::required("Extensions"),
];

pub const LAP_TPX_TEMPLATE: &[Slot] = &[
    Slot::required("TotalPower"),
    Slot::required("AverageCadence"),
    Slot::required("MaximumCadence"),
    Slot::required("AverageResistance"),
    Slot::required("MaximumResistance"),
    Slot::required("AverageSpeed"),
    Slot::required("MaximumSpeed"),
    Slot::required("AverageWatts"),
    Slot::required("MaximumWatts"),
];

pub const TRACKPOINT_TEMPLATE: &[Slot] = &[
    Slot::required("Time"),
    Slot::optional("HeartRateBpm"),
    Slot::optional("Cadence"),
    Slot::optional("DistanceMeters"),
    Slot::required("Extensions"),
];

pub const TRACKPOINT_TPX_TEMPLATE: &[Slot] = &[
    Slot::optional("Speed"),
    Slot::optional("Watts"),
    Slot::optional("Resistance"),
];

/// Content of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Text(String),
    Children(Vec<Element>),
}

/// One XML element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: &'static str,
    pub attributes: Vec<(&'static str, String)>,
    pub body: Body,
}

impl Element {
    /// Element holding text.
    pub fn text(name: &'static str, text: impl Into<String>) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            body: Body::Text(text.into()),
        }
    }

    /// Element holding child elements in the given order.
    pub fn container(name: &'static str, children: Vec<Element>) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            body: Body::Children(children),
        }
    }

    /// Element wrapping a single `Value` child, as TCX heart rate fields do.
    pub fn value(name: &'static str, text: impl Into<String>) -> Self {
        Self::container(name, vec![Self::text("Value", text)])
    }

    /// Element whose children are ordered by a template.
    pub fn from_template(
        name: &'static str,
        template: &[Slot],
        slots: Slots,
    ) -> Result<Self, ExportError> {
        Ok(Self::container(name, slots.arrange(template)?))
    }

    pub fn with_attribute(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((key, value.into()));
        self
    }

    /// Child elements, empty for text elements.
    pub fn children(&self) -> &[Element] {
        match &self.body {
            Body::Children(children) => children.as_slice(),
            Body::Text(_) => &[],
        }
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children().iter().find(|c| c.name == name)
    }

    pub fn child_names(&self) -> Vec<&'static str> {
        self.children().iter().map(|c| c.name).collect()
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.body {
            Body::Text(text) => Some(text),
            Body::Children(_) => None,
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Elements waiting to be ordered by a template.
#[derive(Debug, Default)]
pub struct Slots {
    elements: Vec<Element>,
}

impl Slots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn set_opt(&mut self, element: Option<Element>) {
        if let Some(element) = element {
            self.set(element);
        }
    }

    /// Order the collected elements by `template`.
    ///
    /// Elements whose name the template does not list are dropped.
    pub fn arrange(mut self, template: &[Slot]) -> Result<Vec<Element>, ExportError> {
        let mut ordered = Vec::with_capacity(template.len());
        for slot in template {
            match self.elements.iter().position(|e| e.name == slot.name) {
                Some(pos) => ordered.push(self.elements.remove(pos)),
                None if slot.presence == Presence::Required => {
                    return Err(ExportError::MissingElement(slot.name));
                }
                None => {}
            }
        }
        for stray in &self.elements {
            tracing::debug!("Dropping element {} not in template", stray.name);
        }
        Ok(ordered)
    }
}

/// Wrap an activity in the `TrainingCenterDatabase` root.
pub fn tcx_document(activity: Element) -> Element {
    Element::container(ROOT, vec![Element::container("Activities", vec![activity])])
        .with_attribute("xsi:schemaLocation", SCHEMA_LOCATION)
        .with_attribute("xmlns:ns3", NS_ACTIVITY_EXTENSION)
        .with_attribute("xmlns", NS_TCX)
        .with_attribute("xmlns:xsi", NS_XSI)
        .with_attribute("xmlns:ns4", NS_PROFILE_EXTENSION)
}

/// Serialize a document with an XML declaration.
///
/// `indent` is the number of spaces per nesting level; `0` writes compact XML.
pub fn write_document(root: &Element, indent: usize) -> Result<String, ExportError> {
    let mut writer = if indent == 0 {
        Writer::new(Cursor::new(Vec::new()))
    } else {
        Writer::new_with_indent(Cursor::new(Vec::new()), b' ', indent)
    };

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, root)?;

    let result = writer.into_inner().into_inner();
    String::from_utf8(result).map_err(|e| ExportError::XmlError(e.to_string()))
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    element: &Element,
) -> Result<(), ExportError> {
    let mut start = BytesStart::new(element.name);
    for (key, value) in &element.attributes {
        start.push_attribute((*key, value.as_str()));
    }

    match &element.body {
        Body::Text(text) => {
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::Text(BytesText::new(text)))?;
            writer.write_event(Event::End(BytesEnd::new(element.name)))?;
        }
        Body::Children(children) if children.is_empty() => {
            writer.write_event(Event::Empty(start))?;
        }
        Body::Children(children) => {
            writer.write_event(Event::Start(start))?;
            for child in children {
                write_element(writer, child)?;
            }
            writer.write_event(Event::End(BytesEnd::new(element.name)))?;
        }
    }

    Ok(())
}
