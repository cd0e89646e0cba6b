//! `ID2D1EffectImpl` and the registration of custom effects.

use crate::abi::*;
use crate::shadow::*;
use crate::unknown::required;
use crate::utility::{native_enum, panic_message, to_wide};
use crate::*;
use std::ffi::c_void;
use std::fmt::Write;
use std::panic::catch_unwind;
use std::sync::Arc;

native_enum! {
    /// `D2D1_CHANGE_TYPE`
    pub enum ChangeType {
        None = 0,
        Properties = 1,
        Context = 2,
        Graph = 3,
    }
}

pub trait EffectImpl: Send + Sync {
    /// Called once after creation with the effect context and the transform
    /// graph the effect should populate.
    fn initialize(&self, context: &Unknown, graph: &Unknown) -> Result<()>;

    fn prepare_for_render(&self, change: ChangeType) -> Result<()>;

    /// Only called for effects with a variable number of inputs.
    fn set_graph(&self, _graph: &Unknown) -> Result<()> {
        Err(ErrorKind::NotImpl.into())
    }
}

#[allow(non_snake_case)]
#[repr(C)]
pub struct EffectImplVtbl {
    pub base: IUnknownVtbl,
    pub Initialize: unsafe extern "system" fn(
        this: *mut c_void,
        context: *mut c_void,
        graph: *mut c_void,
    ) -> HResult,
    pub PrepareForRender: unsafe extern "system" fn(this: *mut c_void, change: u32) -> HResult,
    pub SetGraph: unsafe extern "system" fn(this: *mut c_void, graph: *mut c_void) -> HResult,
}

static VTBL: EffectImplVtbl = EffectImplVtbl {
    base: IUnknownVtbl::new::<EffectImplVtbl>(),
    Initialize: initialize,
    PrepareForRender: prepare_for_render,
    SetGraph: set_graph,
};

unsafe impl Interface for EffectImplVtbl {
    type Callback = dyn EffectImpl;

    const NAME: &'static str = "ID2D1EffectImpl";
    const IIDS: &'static [GUID] = &[IID_ID2D1EffectImpl];

    #[inline]
    fn vtable() -> &'static Self {
        &VTBL
    }
}

pub type EffectImplShadow = Shadow<EffectImplVtbl>;

impl Shadow<EffectImplVtbl> {
    /// A shadow whose properties can be reached by the bindings of `E`.
    pub fn from_effect<E: CustomEffect>(effect: Arc<E>) -> Self {
        Self::with_concrete(effect.clone(), effect, ShadowConfig::default())
    }
}

unsafe extern "system" fn initialize(
    this: *mut c_void,
    context: *mut c_void,
    graph: *mut c_void,
) -> HResult {
    dispatch::<dyn EffectImpl>(this, "Initialize", |effect| {
        effect.initialize(&required(context)?, &required(graph)?)
    })
}

unsafe extern "system" fn prepare_for_render(this: *mut c_void, change: u32) -> HResult {
    dispatch::<dyn EffectImpl>(this, "PrepareForRender", |effect| {
        effect.prepare_for_render(change.try_into()?)
    })
}

unsafe extern "system" fn set_graph(this: *mut c_void, graph: *mut c_void) -> HResult {
    dispatch::<dyn EffectImpl>(this, "SetGraph", |effect| {
        effect.set_graph(&required(graph)?)
    })
}

/// The descriptive part of an effect's registration XML.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct EffectMetadata {
    pub display_name: String,
    pub author: String,
    pub category: String,
    pub description: String,
    pub inputs: Vec<String>,
}

impl EffectMetadata {
    #[inline]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    #[inline]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[inline]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[inline]
    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(name.into());
        self
    }
}

/// An effect implemented in Rust that Direct2D can instantiate by CLSID.
pub trait CustomEffect: EffectImpl + Default + Sized + 'static {
    const CLSID: GUID;

    fn metadata() -> EffectMetadata;

    fn properties() -> Vec<PropertyBinding<Self>> {
        Vec::new()
    }
}

/// Creates a fresh `E` for each native request.
unsafe extern "system" fn create_effect<E: CustomEffect>(effect_impl: *mut *mut c_void) -> HResult {
    if effect_impl.is_null() {
        return E_POINTER;
    }
    *effect_impl = std::ptr::null_mut();
    match catch_unwind(E::default) {
        Ok(effect) => {
            let shadow = EffectImplShadow::from_effect(Arc::new(effect));
            log::debug!("created {}", std::any::type_name::<E>());
            *effect_impl = shadow.into_raw();
            S_OK
        }
        Err(payload) => {
            log::error!(
                "{}::default panicked: {}",
                std::any::type_name::<E>(),
                panic_message(&*payload)
            );
            E_FAIL
        }
    }
}

fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&apos;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn effect_xml<E: CustomEffect>(metadata: &EffectMetadata, properties: &[PropertyBinding<E>]) -> String {
    let mut xml = String::from("<?xml version='1.0'?>\n<Effect>\n");
    for (name, value) in [
        ("DisplayName", &metadata.display_name),
        ("Author", &metadata.author),
        ("Category", &metadata.category),
        ("Description", &metadata.description),
    ] {
        let _ = writeln!(
            xml,
            "    <Property name='{}' type='string' value='{}'/>",
            name,
            escape(value)
        );
    }
    xml.push_str("    <Inputs>\n");
    for input in &metadata.inputs {
        let _ = writeln!(xml, "        <Input name='{}'/>", escape(input));
    }
    xml.push_str("    </Inputs>\n");
    for property in properties {
        let name = escape(property.name());
        let _ = writeln!(
            xml,
            "    <Property name='{}' type='{}'>",
            name,
            property.type_name()
        );
        let _ = writeln!(
            xml,
            "        <Property name='DisplayName' type='string' value='{}'/>",
            name
        );
        if let Some(default) = property.default_xml() {
            let _ = writeln!(
                xml,
                "        <Property name='Default' type='{}' value='{}'/>",
                property.type_name(),
                escape(default)
            );
        }
        xml.push_str("    </Property>\n");
    }
    xml.push_str("</Effect>\n");
    xml
}

/// Everything `ID2D1Factory1::RegisterEffectFromString` needs for `E`.
///
/// The binding array points into strings owned by this value, so it must be
/// kept alive until the registration call returns.
pub struct EffectRegistration {
    clsid: GUID,
    xml: String,
    wide_xml: Vec<u16>,
    _names: Vec<Vec<u16>>,
    bindings: Vec<D2D1_PROPERTY_BINDING>,
    factory: PD2D1_EFFECT_FACTORY,
}

impl EffectRegistration {
    pub fn new<E: CustomEffect>() -> Self {
        let properties = E::properties();
        let xml = effect_xml(&E::metadata(), &properties);
        let names = properties
            .iter()
            .map(|p| to_wide(p.name()))
            .collect::<Vec<_>>();
        let bindings = properties
            .iter()
            .zip(&names)
            .map(|(p, name)| D2D1_PROPERTY_BINDING {
                propertyName: name.as_ptr(),
                setFunction: Some(p.set_function()),
                getFunction: Some(p.get_function()),
            })
            .collect();
        Self {
            clsid: E::CLSID,
            wide_xml: to_wide(&xml),
            xml,
            _names: names,
            bindings,
            factory: create_effect::<E>,
        }
    }

    #[inline]
    pub fn clsid(&self) -> &GUID {
        &self.clsid
    }

    #[inline]
    pub fn xml(&self) -> &str {
        &self.xml
    }

    /// The XML as a NUL-terminated UTF-16 string.
    #[inline]
    pub fn wide_xml(&self) -> &[u16] {
        &self.wide_xml
    }

    #[inline]
    pub fn bindings(&self) -> &[D2D1_PROPERTY_BINDING] {
        &self.bindings
    }

    #[inline]
    pub fn factory(&self) -> PD2D1_EFFECT_FACTORY {
        self.factory
    }
}

impl std::fmt::Debug for EffectRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("EffectRegistration")
            .field("clsid", &self.clsid)
            .field("xml", &self.xml)
            .field("bindings", &self.bindings.len())
            .finish()
    }
}

unsafe impl Send for EffectRegistration {}
unsafe impl Sync for EffectRegistration {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use crate::utility::wide_cstr;
    use parking_lot::Mutex;
    use std::mem::size_of;

    #[derive(Default)]
    struct Ripple {
        frequency: Mutex<f32>,
        center: Mutex<glam::Vec2>,
        enabled: Mutex<bool>,
        changes: Mutex<Vec<ChangeType>>,
        initialized: Mutex<bool>,
    }

    impl EffectImpl for Ripple {
        fn initialize(&self, _: &Unknown, _: &Unknown) -> Result<()> {
            *self.initialized.lock() = true;
            Ok(())
        }

        fn prepare_for_render(&self, change: ChangeType) -> Result<()> {
            self.changes.lock().push(change);
            Ok(())
        }
    }

    struct Frequency;

    impl Property<Ripple> for Frequency {
        const NAME: &'static str = "Frequency";
        type Value = f32;

        fn get(effect: &Ripple) -> f32 {
            *effect.frequency.lock()
        }

        fn set(effect: &Ripple, value: f32) -> Result<()> {
            if value < 0.0 {
                return Err(Error::new(ErrorKind::InvalidArg, "negative frequency"));
            }
            *effect.frequency.lock() = value;
            Ok(())
        }

        fn default_value() -> Option<f32> {
            Some(0.0)
        }
    }

    struct Center;

    impl Property<Ripple> for Center {
        const NAME: &'static str = "Center";
        type Value = glam::Vec2;

        fn get(effect: &Ripple) -> glam::Vec2 {
            *effect.center.lock()
        }

        fn set(effect: &Ripple, value: glam::Vec2) -> Result<()> {
            *effect.center.lock() = value;
            Ok(())
        }
    }

    struct Enabled;

    impl Property<Ripple> for Enabled {
        const NAME: &'static str = "Enabled";
        type Value = bool;

        fn get(effect: &Ripple) -> bool {
            *effect.enabled.lock()
        }

        fn set(effect: &Ripple, value: bool) -> Result<()> {
            *effect.enabled.lock() = value;
            Ok(())
        }

        fn default_value() -> Option<bool> {
            Some(true)
        }
    }

    impl CustomEffect for Ripple {
        const CLSID: GUID = GUID::from_u128(0xb7b36c92_3498_4a94_9e95_9f24654f2a34);

        fn metadata() -> EffectMetadata {
            EffectMetadata::new("Ripple")
                .author("mltg")
                .category("Stylize & Distort")
                .description("Concentric <waves>")
                .input("Source")
        }

        fn properties() -> Vec<PropertyBinding<Self>> {
            vec![
                PropertyBinding::of::<Frequency>(),
                PropertyBinding::of::<Center>(),
                PropertyBinding::of::<Enabled>(),
            ]
        }
    }

    #[derive(Default)]
    struct Plain;

    impl EffectImpl for Plain {
        fn initialize(&self, _: &Unknown, _: &Unknown) -> Result<()> {
            Ok(())
        }

        fn prepare_for_render(&self, _: ChangeType) -> Result<()> {
            Ok(())
        }
    }

    impl CustomEffect for Plain {
        const CLSID: GUID = GUID::from_u128(0x0c9c5a4e_2a5f_4a1e_8d53_7a3f3fd0a9f1);

        fn metadata() -> EffectMetadata {
            EffectMetadata::new("Plain")
        }
    }

    fn create(registration: &EffectRegistration) -> *mut c_void {
        let mut raw = std::ptr::null_mut();
        unsafe {
            assert_eq!((registration.factory())(&mut raw), S_OK);
        }
        assert!(!raw.is_null());
        raw
    }

    #[test]
    fn vtable_layout_test() {
        assert_eq!(size_of::<EffectImplVtbl>() / size_of::<usize>(), 6);
    }

    #[test]
    fn xml_test() {
        let registration = EffectRegistration::new::<Ripple>();
        let xml = registration.xml();
        assert!(xml.starts_with("<?xml version='1.0'?>\n<Effect>\n"));
        assert!(xml.contains("<Property name='DisplayName' type='string' value='Ripple'/>"));
        assert!(xml.contains("value='Stylize &amp; Distort'"));
        assert!(xml.contains("value='Concentric &lt;waves&gt;'"));
        assert!(xml.contains("<Input name='Source'/>"));
        assert!(xml.contains("<Property name='Frequency' type='float'>"));
        assert!(xml.contains("<Property name='Default' type='float' value='0.0'/>"));
        assert!(xml.contains("<Property name='Center' type='vector2'>"));
        assert!(xml.contains("<Property name='Default' type='bool' value='true'/>"));
        assert!(xml.ends_with("</Effect>\n"));
        assert_eq!(registration.wide_xml().last(), Some(&0));
        assert_eq!(registration.clsid(), &Ripple::CLSID);

        let plain = EffectRegistration::new::<Plain>();
        assert!(plain.xml().contains("<Inputs>\n    </Inputs>"));
        assert!(plain.bindings().is_empty());
    }

    #[test]
    fn bindings_test() {
        let registration = EffectRegistration::new::<Ripple>();
        let names = registration
            .bindings()
            .iter()
            .map(|b| unsafe { wide_cstr(b.propertyName) }.unwrap())
            .collect::<Vec<_>>();
        assert_eq!(names, ["Frequency", "Center", "Enabled"]);
        assert!(registration
            .bindings()
            .iter()
            .all(|b| b.setFunction.is_some() && b.getFunction.is_some()));
    }

    #[test]
    fn factory_test() {
        init_logger();
        let registration = EffectRegistration::new::<Ripple>();
        let a = create(&registration);
        let b = create(&registration);
        assert_ne!(a, b);
        let context = FakeUnknown::new();
        let graph = FakeUnknown::new();
        unsafe {
            let vtbl = vtbl::<EffectImplVtbl>(a);
            let mut object = std::ptr::null_mut();
            assert_eq!(
                (vtbl.base.QueryInterface)(a, &IID_ID2D1EffectImpl, &mut object),
                S_OK
            );
            (vtbl.base.Release)(a);
            assert_eq!((vtbl.Initialize)(a, context.as_raw(), graph.as_raw()), S_OK);
            assert_eq!((vtbl.Initialize)(a, context.as_raw(), std::ptr::null_mut()), E_POINTER);
            assert_eq!((vtbl.PrepareForRender)(a, 1), S_OK);
            assert_eq!((vtbl.PrepareForRender)(a, 4), E_INVALIDARG);
            assert_eq!((vtbl.SetGraph)(a, graph.as_raw()), E_NOTIMPL);
            assert_eq!((vtbl.base.Release)(a), 0);
            assert_eq!((vtbl.base.Release)(b), 0);
        }
        assert_eq!(context.ref_count(), 1);
        assert_eq!(graph.ref_count(), 1);
        unsafe {
            assert_eq!((registration.factory())(std::ptr::null_mut()), E_POINTER);
        }
    }

    #[test]
    fn property_set_get_test() {
        let registration = EffectRegistration::new::<Ripple>();
        let [frequency, center, enabled] = registration.bindings() else {
            panic!("three bindings expected");
        };
        let effect = Arc::new(Ripple::default());
        let shadow = EffectImplShadow::from_effect(effect.clone());
        let raw = shadow.as_raw() as *const c_void;
        let context = FakeUnknown::new();
        unsafe {
            let vtbl = vtbl::<EffectImplVtbl>(shadow.as_raw());
            assert_eq!(
                (vtbl.Initialize)(shadow.as_raw(), context.as_raw(), context.as_raw()),
                S_OK
            );
            assert!(*effect.initialized.lock());
            assert_eq!((vtbl.PrepareForRender)(shadow.as_raw(), 1), S_OK);
            assert_eq!(*effect.changes.lock(), vec![ChangeType::Properties]);

            let set = frequency.setFunction.unwrap();
            let get = frequency.getFunction.unwrap();
            let value = 2.5f32.to_ne_bytes();
            assert_eq!(set(raw, value.as_ptr(), 4), S_OK);
            assert_eq!(*effect.frequency.lock(), 2.5);

            let mut out = [0u8; 4];
            let mut actual = 0;
            assert_eq!(get(raw, out.as_mut_ptr(), 4, &mut actual), S_OK);
            assert_eq!(actual, 4);
            assert_eq!(f32::from_ne_bytes(out), 2.5);

            let negative = (-1.0f32).to_ne_bytes();
            assert_eq!(set(raw, negative.as_ptr(), 4), E_INVALIDARG);
            assert_eq!(*effect.frequency.lock(), 2.5);

            let set = center.setFunction.unwrap();
            let value = [1.0f32, 2.0];
            assert_eq!(set(raw, value.as_ptr() as *const u8, 8), S_OK);
            assert_eq!(set(raw, value.as_ptr() as *const u8, 4), E_INVALIDARG);
            assert_eq!(*effect.center.lock(), glam::Vec2::new(1.0, 2.0));

            let set = enabled.setFunction.unwrap();
            assert_eq!(set(raw, 1i32.to_ne_bytes().as_ptr(), 4), S_OK);
            assert!(*effect.enabled.lock());
        }
    }

    #[test]
    fn insufficient_buffer_test() {
        let registration = EffectRegistration::new::<Ripple>();
        let center = &registration.bindings()[1];
        let shadow = EffectImplShadow::from_effect(Arc::new(Ripple::default()));
        let raw = shadow.as_raw() as *const c_void;
        unsafe {
            let get = center.getFunction.unwrap();
            let mut actual = 0;
            assert_eq!(
                get(raw, std::ptr::null_mut(), 0, &mut actual),
                E_NOT_SUFFICIENT_BUFFER
            );
            assert_eq!(actual, 8);
            let mut out = [0xffu8; 8];
            let mut actual = 0;
            assert_eq!(
                get(raw, out.as_mut_ptr(), 4, &mut actual),
                E_NOT_SUFFICIENT_BUFFER
            );
            assert_eq!(actual, 8);
            assert_eq!(out, [0xff; 8]);
            assert_eq!(get(raw, out.as_mut_ptr(), 8, std::ptr::null_mut()), S_OK);
            assert_eq!(out, [0; 8]);
        }
    }

    #[test]
    fn property_on_released_effect_test() {
        let registration = EffectRegistration::new::<Ripple>();
        let frequency = &registration.bindings()[0];
        let shadow = EffectImplShadow::from_effect(Arc::new(Ripple::default()));
        let raw = shadow.as_raw() as *const c_void;
        shadow.unregister();
        unsafe {
            let set = frequency.setFunction.unwrap();
            let value = 1.0f32.to_ne_bytes();
            assert_eq!(set(raw, value.as_ptr(), 4), RO_E_CLOSED);
        }
    }

    #[test]
    fn property_on_plain_shadow_test() {
        let registration = EffectRegistration::new::<Ripple>();
        let frequency = &registration.bindings()[0];
        let shadow = EffectImplShadow::new(Arc::new(Ripple::default()));
        unsafe {
            let get = frequency.getFunction.unwrap();
            let mut out = [0u8; 4];
            let mut actual = 0;
            assert_eq!(
                get(shadow.as_raw(), out.as_mut_ptr(), 4, &mut actual),
                E_INVALIDARG
            );
        }
    }
}
