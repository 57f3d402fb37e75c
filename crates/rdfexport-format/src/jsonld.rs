//! JSON-LD writer.
//!
//! The document is a single object with an `@context` and an `@graph` array.
//! Each resource is buffered as a JSON object and written out when it ends.
//! Keys keep emission order (`serde_json` with `preserve_order`).

use std::io::Write;

use serde_json::{Map, Value as Json, json};

use rdfexport_core::{RdfField, Result, Value, expand_datatype, format_value};

use crate::writer::{RDF_DESCRIPTION, ResourceWriter, WriterCore, WriterPhase};

#[derive(Debug)]
pub struct JsonLdWriter<W: Write> {
    core: WriterCore<W>,
    current: Option<Resource>,
    written: usize,
}

#[derive(Debug)]
struct Resource {
    object: Map<String, Json>,
    typed: bool,
    properties: usize,
}

impl<W: Write> JsonLdWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            core: WriterCore::new(out),
            current: None,
            written: 0,
        }
    }

    pub fn get_ref(&self) -> &W {
        self.core.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.core.into_inner()
    }

    /// `@base` and `@vocab` first, then the namespaces sorted by prefix.
    fn context(&self) -> Json {
        let mut context = Map::new();
        if let Some(base) = &self.core.base_url {
            context.insert("@base".to_string(), Json::String(base.clone()));
        }
        if let Some(vocabulary) = &self.core.vocabulary {
            context.insert("@vocab".to_string(), Json::String(vocabulary.clone()));
        }
        for (prefix, uri) in &self.core.namespaces {
            context.insert(prefix.clone(), Json::String(uri.clone()));
        }
        Json::Object(context)
    }

    fn property_value(&self, field: &RdfField, value: &Value) -> Result<Json> {
        if field.is_reference() {
            return Ok(json!({ "@id": self.core.reference_target(field, value)? }));
        }
        let text = format_value(value)?;
        let node = if field.is_typed() {
            json!({ "@type": expand_datatype(&field.datatype), "@value": text })
        } else if field.has_language() {
            json!({ "@language": field.language, "@value": text })
        } else {
            Json::String(text)
        };
        Ok(node)
    }
}

/// Add a value under `key`, turning a repeated key into an array.
fn append(object: &mut Map<String, Json>, key: &str, value: Json) {
    match object.get_mut(key) {
        None => {
            object.insert(key.to_string(), value);
        }
        Some(Json::Array(values)) => values.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Json::Array(vec![first, value]);
        }
    }
}

impl<W: Write> ResourceWriter for JsonLdWriter<W> {
    fn phase(&self) -> WriterPhase {
        self.core.phase()
    }

    fn set_vocabulary(&mut self, uri: &str) -> Result<()> {
        self.core.set_vocabulary(uri)
    }

    fn add_namespace(&mut self, prefix: &str, uri: &str) -> Result<()> {
        self.core.add_namespace(prefix, uri)
    }

    fn set_base_url(&mut self, uri: Option<&str>) -> Result<()> {
        self.core.set_base_url(uri)
    }

    fn set_empty_string_is_null(&mut self, enabled: bool) -> Result<()> {
        self.core.set_empty_string_is_null(enabled)
    }

    fn write_header(&mut self) -> Result<()> {
        if !self.core.begin_header()? {
            return Ok(());
        }
        let context = serde_json::to_string(&self.context())?;
        self.core
            .write_str(&format!("{{\"@context\":{},\"@graph\":[", context))
    }

    fn write_start_resource(
        &mut self,
        class: &str,
        segment: &str,
        id: Option<&str>,
    ) -> Result<()> {
        self.core.ensure_writing("start a resource")?;
        let mut object = Map::new();
        object.insert(
            "@id".to_string(),
            Json::String(self.core.subject(segment, id)),
        );
        let typed = class != RDF_DESCRIPTION;
        if typed {
            object.insert("@type".to_string(), Json::String(class.to_string()));
        }
        self.current = Some(Resource {
            object,
            typed,
            properties: 0,
        });
        Ok(())
    }

    fn write_property(&mut self, field: &RdfField, value: &Value) -> Result<()> {
        self.core.ensure_writing("write a property")?;
        if self.core.suppresses(value) {
            return Ok(());
        }
        let node = self.property_value(field, value)?;
        match self.current.as_mut() {
            Some(resource) => {
                append(&mut resource.object, &field.name, node);
                resource.properties += 1;
                Ok(())
            }
            None => Err(rdfexport_core::Error::invalid_state(
                "can't write a property outside a resource",
            )),
        }
    }

    fn write_end_resource(&mut self, _class: &str) -> Result<()> {
        self.core.ensure_writing("end a resource")?;
        let Some(resource) = self.current.take() else {
            return Ok(());
        };
        if !resource.typed && resource.properties == 0 {
            return Ok(());
        }
        let lead = if self.written == 0 { "\n" } else { ",\n" };
        let text = serde_json::to_string(&Json::Object(resource.object))?;
        self.core.write_str(lead)?;
        self.core.write_str(&text)?;
        self.written += 1;
        Ok(())
    }

    fn write_footer(&mut self) -> Result<()> {
        self.write_header()?;
        self.core.write_str("\n]}\n")?;
        self.core.finish()
    }
}
