use js_sys::{Array, Function, Reflect, JSON};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use scrollcue_api_core::Value;
use scrollcue_orchestrator::{
    Config, ElementHost, Orchestrator, OrchestratorError, Rect, RegId, RegistrationSpec, ScopeId,
};

/// Scroll-synchronized animation engine driven from JS.
///
/// The host object supplies three callbacks:
///   select(root: string | null, selector: string) -> string[]
///   bounds(handle: string) -> { x, y, width, height } | null
///   read(handle: string, property: string) -> number | Value | null   (optional)
#[wasm_bindgen]
pub struct ScrollCue {
    core: Orchestrator,
    host: JsHost,
}

struct JsHost {
    select: Function,
    bounds: Function,
    read: Option<Function>,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn host_fn(host: &JsValue, name: &str) -> Result<Option<Function>, JsError> {
    let val = Reflect::get(host, &JsValue::from_str(name))
        .map_err(|e| JsError::new(&format!("host.{name}: {e:?}")))?;
    if jsvalue_is_undefined_or_null(&val) {
        return Ok(None);
    }
    val.dyn_into::<Function>()
        .map(Some)
        .map_err(|_| JsError::new(&format!("host.{name} must be a function")))
}

impl JsHost {
    fn from_object(host: &JsValue) -> Result<Self, JsError> {
        if jsvalue_is_undefined_or_null(host) {
            return Err(JsError::new("host object is null/undefined"));
        }
        let select =
            host_fn(host, "select")?.ok_or_else(|| JsError::new("host.select is required"))?;
        let bounds =
            host_fn(host, "bounds")?.ok_or_else(|| JsError::new("host.bounds is required"))?;
        Ok(Self {
            select,
            bounds,
            read: host_fn(host, "read")?,
        })
    }
}

fn js_error(e: OrchestratorError) -> JsError {
    JsError::new(&format!("{} error: {e}", e.category()))
}

impl ElementHost for JsHost {
    fn select(&self, root: Option<&str>, selector: &str) -> Vec<String> {
        let root = root.map_or(JsValue::NULL, JsValue::from_str);
        match self.select.call2(&JsValue::UNDEFINED, &root, &JsValue::from_str(selector)) {
            Ok(val) if Array::is_array(&val) => Array::from(&val)
                .iter()
                .filter_map(|h| h.as_string())
                .collect(),
            // A throwing or malformed selector callback matches nothing.
            _ => Vec::new(),
        }
    }

    fn bounds(&self, handle: &str) -> Option<Rect> {
        let val = self
            .bounds
            .call1(&JsValue::UNDEFINED, &JsValue::from_str(handle))
            .ok()?;
        if jsvalue_is_undefined_or_null(&val) {
            return None;
        }
        swb::from_value(val).ok()
    }

    fn read(&self, handle: &str, property: &str) -> Option<Value> {
        let read = self.read.as_ref()?;
        let val = read
            .call2(
                &JsValue::UNDEFINED,
                &JsValue::from_str(handle),
                &JsValue::from_str(property),
            )
            .ok()?;
        if let Some(n) = val.as_f64() {
            return Some(Value::Float(n as f32));
        }
        if jsvalue_is_undefined_or_null(&val) {
            return None;
        }
        swb::from_value(val).ok()
    }
}

#[wasm_bindgen]
impl ScrollCue {
    /// Create an engine. Pass a JSON config object or undefined/null for
    /// defaults, e.g.
    /// `new ScrollCue({ default_scrub_lag: 1 }, { select, bounds }, innerWidth, innerHeight)`.
    ///
    /// The viewport size is optional; without it trigger positions measured
    /// against the viewport resolve at a zero-height viewport until the
    /// first `onResize`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config: JsValue,
        host: JsValue,
        viewport_width: Option<f32>,
        viewport_height: Option<f32>,
    ) -> Result<ScrollCue, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        cfg.validate().map_err(js_error)?;
        let host = JsHost::from_object(&host)?;

        let core = match (viewport_width, viewport_height) {
            (None, None) => Orchestrator::new(cfg),
            (Some(w), Some(h)) if w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0 => {
                Orchestrator::new(cfg).with_viewport(w, h)
            }
            _ => {
                return Err(JsError::new(
                    "viewport needs both a positive finite width and height",
                ))
            }
        };

        Ok(ScrollCue { core, host })
    }

    /// Open a scope for a mounted section. Returns the scope id.
    pub fn mount(&mut self, label: String, root: Option<String>) -> u32 {
        self.core.mount(&label, root.as_deref()).0
    }

    /// Dispose a scope. Returns `{ scope, registrations, cancelled }`.
    pub fn unmount(&mut self, scope: u32) -> Result<JsValue, JsError> {
        let disposal = self.core.unmount(ScopeId(scope));
        swb::to_value(&disposal).map_err(|e| JsError::new(&format!("disposal error: {e}")))
    }

    #[wasm_bindgen(js_name = killAll)]
    pub fn kill_all(&mut self) -> Result<JsValue, JsError> {
        let disposals = self.core.kill_all();
        swb::to_value(&disposals).map_err(|e| JsError::new(&format!("disposal error: {e}")))
    }

    /// Register a trigger/motion binding in `scope`. Accepts a JSON string or
    /// a plain object. Returns the registration id.
    pub fn register(&mut self, scope: u32, spec: JsValue) -> Result<u32, JsError> {
        if jsvalue_is_undefined_or_null(&spec) {
            return Err(JsError::new("register: spec is null/undefined"));
        }
        let text = match spec.as_string() {
            Some(s) => s,
            None => JSON::stringify(&spec)
                .map_err(|e| JsError::new(&format!("register stringify error: {e:?}")))?
                .as_string()
                .ok_or_else(|| JsError::new("register: stringify produced non-string"))?,
        };
        let spec = RegistrationSpec::from_json_str(&text).map_err(js_error)?;
        self.core
            .register(&self.host, ScopeId(scope), spec)
            .map(|id| id.0)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = onScroll)]
    pub fn on_scroll(&mut self, scroll_y: f32) {
        self.core.on_scroll(&self.host, scroll_y);
    }

    #[wasm_bindgen(js_name = onResize)]
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.core.on_resize(&self.host, width, height);
    }

    /// Re-read geometry and re-resolve idle registrations after DOM changes.
    pub fn refresh(&mut self) {
        self.core.refresh(&self.host);
    }

    /// Returns the target `{ rotate_x, rotate_y }`, or null when the element
    /// has no box.
    ///
    /// `x` and `y` are document coordinates, the same space the host's
    /// `bounds` callback reports in. From a DOM event that is
    /// `pageX`/`pageY` (or `clientX + scrollX`).
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, handle: String, x: f32, y: f32) -> Result<JsValue, JsError> {
        match self.core.pointer_move(&self.host, &handle, x, y) {
            Some(tilt) => {
                swb::to_value(&tilt).map_err(|e| JsError::new(&format!("tilt error: {e}")))
            }
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self, handle: String) -> bool {
        self.core.pointer_leave(&handle)
    }

    /// One-shot start of a manual registration.
    pub fn fire(&mut self, registration: u32) -> Result<bool, JsError> {
        self.core.fire(RegId(registration)).map_err(js_error)
    }

    /// Advance by `dt` seconds. Returns `{ epoch, dt, writes, events }`.
    pub fn tick(&mut self, dt: f32) -> Result<JsValue, JsError> {
        let frame = self.core.tick(dt);
        swb::to_value(&frame).map_err(|e| JsError::new(&format!("frame error: {e}")))
    }

    /// Replay state name, or null for unknown registrations.
    pub fn state(&self, registration: u32) -> Result<JsValue, JsError> {
        match self.core.state(RegId(registration)) {
            Some(state) => {
                swb::to_value(&state).map_err(|e| JsError::new(&format!("state error: {e}")))
            }
            None => Ok(JsValue::NULL),
        }
    }

    pub fn progress(&self, registration: u32) -> Option<f32> {
        self.core.progress(RegId(registration))
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
