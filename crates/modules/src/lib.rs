//! The standard module library: the handful of statement kinds a host
//! needs to run any of §8's scenarios, and that a real program built on
//! top of the engine composes from (value/list/map literals, `echo`'s
//! named-object resolution, and `call`'s Sub-Process Primitive).

mod call;
mod echo;
mod literals;
mod methods;
mod stubs;

pub use call::CallModule;
pub use echo::EchoModule;
pub use literals::{ListModule, MapModule, ValueModule};
pub use methods::ListLengthModule;
pub use stubs::{FailOnceModule, StubUpModule, ToggleModule};

use std::rc::Rc;

use ncd_registry::{Module, Registry};
use ncd_subprocess::TemplateMap;

/// Registers every module in this library under its `base_type` name.
/// `templates` backs `call`'s template lookups (§4.5); callers that
/// don't use `call` may pass an empty [`TemplateMap`].
pub fn register_standard_modules(registry: &mut Registry, templates: Rc<TemplateMap>) {
    registry.register("value", Rc::new(ValueModule) as Rc<dyn Module>);
    registry.register("list", Rc::new(ListModule) as Rc<dyn Module>);
    registry.register("map", Rc::new(MapModule) as Rc<dyn Module>);
    registry.register("echo", Rc::new(EchoModule) as Rc<dyn Module>);
    registry.register("call", Rc::new(CallModule::new(templates)) as Rc<dyn Module>);
    registry.register("list::length", Rc::new(ListLengthModule) as Rc<dyn Module>);
    registry.register("stub_up", Rc::new(StubUpModule) as Rc<dyn Module>);
    registry.register("fail_once", Rc::new(FailOnceModule::default()) as Rc<dyn Module>);
    registry.register("toggle", Rc::new(ToggleModule) as Rc<dyn Module>);
}
