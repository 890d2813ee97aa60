//! Compiled descriptors (§3 "Statement Descriptor (compiled)" / "Process
//! Descriptor (compiled)"). These are produced by the external program
//! loader (§6); the scheduler only ever reads them.

use ncd_value::ArgumentTemplate;

/// One element of a compiled [`ProcessDescriptor`] (§3).
pub struct StatementDescriptor {
    /// The name other statements use to address this one in the
    /// namespace (§4.4). `None` for anonymous statements, which are
    /// still addressable by nothing but can still export objects read
    /// through special-object proxies (e.g. a template's sole effect).
    pub local_name: Option<String>,
    /// The module-type name as registered in the [`ncd_registry::Registry`].
    pub module_type: String,
    /// A dotted path naming an object this statement is invoked as a
    /// method of (§3 "an optional dotted object path on which the
    /// statement is invoked as a method"). `None` for plain statements.
    pub object_path: Option<String>,
    /// Pre-compiled argument template (§3).
    pub args: ArgumentTemplate,
    /// Pre-computed allocation budget for this statement's arena use
    /// (§3 "pre-computed allocation budget").
    pub alloc_budget: usize,
}

impl StatementDescriptor {
    pub fn new(module_type: impl Into<String>, args: ArgumentTemplate) -> Self {
        Self {
            local_name: None,
            module_type: module_type.into(),
            object_path: None,
            args,
            alloc_budget: 4096,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.local_name = Some(name.into());
        self
    }

    pub fn on_object(mut self, object_path: impl Into<String>) -> Self {
        self.object_path = Some(object_path.into());
        self
    }

    pub fn with_alloc_budget(mut self, bytes: usize) -> Self {
        self.alloc_budget = bytes;
        self
    }
}

/// An ordered sequence of statement descriptors, plus whether the block
/// is a callable template or an auto-started top-level process (§3).
pub struct ProcessDescriptor {
    pub statements: Vec<StatementDescriptor>,
    pub is_template: bool,
}

impl ProcessDescriptor {
    pub fn process(statements: Vec<StatementDescriptor>) -> Self {
        Self {
            statements,
            is_template: false,
        }
    }

    pub fn template(statements: Vec<StatementDescriptor>) -> Self {
        Self {
            statements,
            is_template: true,
        }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
