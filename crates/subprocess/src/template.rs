//! The global template map (§4.5 "identified by a template name that is
//! resolved against the program's global template map"). Populated once
//! at program load, alongside the [`ncd_registry::Registry`] (§9
//! "Global state").

use std::collections::HashMap;
use std::rc::Rc;

use ncd_scheduler::ProcessDescriptor;

use crate::error::{SubprocessError, SubprocessResult};

#[derive(Default, Clone)]
pub struct TemplateMap {
    templates: HashMap<String, Rc<ProcessDescriptor>>,
}

impl TemplateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, descriptor: Rc<ProcessDescriptor>) {
        self.templates.insert(name.into(), descriptor);
    }

    pub fn lookup(&self, name: &str) -> SubprocessResult<Rc<ProcessDescriptor>> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| SubprocessError::UnknownTemplate {
                name: name.to_string(),
            })
    }
}
