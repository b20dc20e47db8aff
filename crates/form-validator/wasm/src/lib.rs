//! Form Validator WASM
//!
//! WebAssembly bindings for the form validator.
//! Binds forms on the live page, re-validates on every input event and runs the
//! initial validation pass when the document becomes interactive.
//!
//! # Example (JavaScript)
//! ```javascript
//! const validator = new FormValidator();
//! const form = new Form('signup');
//! form.field('user').minLength(3).maxLength(12);
//! form.field('zip').regex('^\\d{5}$').optional();
//! form.submit('reset').enabledIfInvalid();
//! validator.addForm(form);
//! ```

use form_validator_core::{
    Field, Form, FormConfig, FormError, ReadyState, Submit, ValidatorRegistry,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub mod dom;
pub mod logging;

pub use dom::{WebDocument, WebElement};

/// Set panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    logging::init(tracing::Level::INFO);
}

fn to_js(err: FormError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// A form on the page, located by the id of its root element
#[wasm_bindgen(js_name = Form)]
pub struct JsForm {
    inner: Form<WebElement>,
}

#[wasm_bindgen(js_class = Form)]
impl JsForm {
    /// Scans the element with the given id. A missing element yields an empty
    /// form and a console warning.
    #[wasm_bindgen(constructor)]
    pub fn new(id: &str) -> Result<JsForm, JsValue> {
        let document =
            WebDocument::current().ok_or_else(|| JsValue::from_str("No document available"))?;
        Ok(Self {
            inner: Form::new(&document, id),
        })
    }

    #[wasm_bindgen(getter)]
    pub fn id(&self) -> String {
        self.inner.id().to_string()
    }

    /// Text field with the given name, `undefined` if there is none
    pub fn field(&self, name: &str) -> Option<JsField> {
        let found = self.inner.field(name).is_ok();
        found.then(|| JsField {
            form: self.inner.clone(),
            name: name.to_string(),
        })
    }

    /// Submit control with the given name, `undefined` if there is none
    pub fn submit(&self, name: &str) -> Option<JsSubmit> {
        let found = self.inner.submit(name).is_ok();
        found.then(|| JsSubmit {
            form: self.inner.clone(),
            name: name.to_string(),
        })
    }

    #[wasm_bindgen(js_name = fieldNames)]
    pub fn field_names(&self) -> Vec<String> {
        self.inner.field_names()
    }

    #[wasm_bindgen(js_name = submitNames)]
    pub fn submit_names(&self) -> Vec<String> {
        self.inner.submit_names()
    }

    #[wasm_bindgen(js_name = validateFields)]
    pub fn validate_fields(&self) {
        self.inner.validate_fields();
    }

    #[wasm_bindgen(js_name = validateSubmits)]
    pub fn validate_submits(&self) -> bool {
        self.inner.validate_submits()
    }

    #[wasm_bindgen(js_name = isValid)]
    pub fn is_valid(&self) -> bool {
        self.inner.is_valid()
    }

    /// Apply rules from a JavaScript object
    ///
    /// ```javascript
    /// form.configure({
    ///     fields: { user: { minLength: 3 }, zip: { regex: '^\\d{5}$', required: false } },
    ///     submits: { reset: 'if_invalid' }
    /// });
    /// ```
    pub fn configure(&self, config: JsValue) -> Result<(), JsValue> {
        let config: FormConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?;
        self.inner.configure(&config).map_err(to_js)
    }
}

/// Chainable rule configuration for one text field
#[wasm_bindgen(js_name = Field)]
#[derive(Clone)]
pub struct JsField {
    form: Form<WebElement>,
    name: String,
}

impl JsField {
    fn update<T>(&self, f: impl FnOnce(&mut Field<WebElement>) -> T) -> Result<T, JsValue> {
        let mut field = self.form.field(&self.name).map_err(to_js)?;
        Ok(f(&mut field))
    }
}

#[wasm_bindgen(js_class = Field)]
impl JsField {
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.name.clone()
    }

    #[wasm_bindgen(js_name = minLength)]
    pub fn min_length(&self, length: u32) -> Result<JsField, JsValue> {
        self.update(|field| {
            field.min_length(length as usize);
        })?;
        Ok(self.clone())
    }

    /// Negative lengths remove the upper limit
    #[wasm_bindgen(js_name = maxLength)]
    pub fn max_length(&self, length: i32) -> Result<JsField, JsValue> {
        self.update(|field| {
            if length < 0 {
                field.unbounded();
            } else {
                field.max_length(length as usize);
            }
        })?;
        Ok(self.clone())
    }

    pub fn regex(&self, pattern: &str) -> Result<JsField, JsValue> {
        self.update(|field| field.regex(pattern).map(|_| ()))?
            .map_err(to_js)?;
        Ok(self.clone())
    }

    pub fn required(&self) -> Result<JsField, JsValue> {
        self.update(|field| {
            field.required();
        })?;
        Ok(self.clone())
    }

    pub fn optional(&self) -> Result<JsField, JsValue> {
        self.update(|field| {
            field.optional();
        })?;
        Ok(self.clone())
    }

    #[wasm_bindgen(js_name = isValid)]
    pub fn is_valid(&self) -> Result<bool, JsValue> {
        self.update(|field| field.is_valid())
    }

    /// Validates and marks the field, returning whether it counts as valid
    pub fn validate(&self) -> Result<bool, JsValue> {
        self.update(|field| field.validate().is_valid())
    }
}

/// Enablement policy of one submit control
#[wasm_bindgen(js_name = Submit)]
#[derive(Clone)]
pub struct JsSubmit {
    form: Form<WebElement>,
    name: String,
}

impl JsSubmit {
    fn update(&self, f: impl FnOnce(&mut Submit<WebElement>)) -> Result<(), JsValue> {
        let mut submit = self.form.submit(&self.name).map_err(to_js)?;
        f(&mut submit);
        Ok(())
    }
}

#[wasm_bindgen(js_class = Submit)]
impl JsSubmit {
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.name.clone()
    }

    #[wasm_bindgen(js_name = enabledAlways)]
    pub fn enabled_always(&self) -> Result<(), JsValue> {
        self.update(|submit| {
            submit.enabled_always();
        })
    }

    #[wasm_bindgen(js_name = enabledIfValid)]
    pub fn enabled_if_valid(&self) -> Result<(), JsValue> {
        self.update(|submit| {
            submit.enabled_if_valid();
        })
    }

    #[wasm_bindgen(js_name = enabledIfInvalid)]
    pub fn enabled_if_invalid(&self) -> Result<(), JsValue> {
        self.update(|submit| {
            submit.enabled_if_invalid();
        })
    }
}

type SharedRegistry = Rc<RefCell<ValidatorRegistry<WebElement>>>;

fn run_ready_hook(registry: &SharedRegistry, document: &web_sys::Document) {
    let state = match document.ready_state().parse::<ReadyState>() {
        Ok(state) => state,
        Err(err) => {
            tracing::warn!("{}", err);
            return;
        }
    };
    match registry.try_borrow_mut() {
        Ok(mut registry) => {
            registry.handle_ready_state(state);
        }
        Err(_) => tracing::warn!("Registry is busy, ready state change ignored"),
    }
}

/// Page-wide registry of validated forms.
///
/// Creating one listens for `readystatechange`, so every registered form gets
/// its initial validation pass when the page becomes interactive. When the
/// page is already past `loading` (module scripts, async wasm init), the pass
/// runs on a zero-delay timer instead, after the current script has added
/// and configured its forms.
#[wasm_bindgen]
pub struct FormValidator {
    registry: SharedRegistry,
}

#[wasm_bindgen]
impl FormValidator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<FormValidator, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;
        let page = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document available"))?;
        let registry: SharedRegistry = Rc::new(RefCell::new(ValidatorRegistry::new()));

        let hook = Rc::clone(&registry);
        let listener_page = page.clone();
        let on_ready = Closure::wrap(
            Box::new(move || run_ready_hook(&hook, &listener_page)) as Box<dyn FnMut()>
        );
        page.add_event_listener_with_callback(
            "readystatechange",
            on_ready.as_ref().unchecked_ref(),
        )?;
        on_ready.forget();

        if page.ready_state() != "loading" {
            let hook = Rc::clone(&registry);
            let deferred = Closure::once_into_js(move || run_ready_hook(&hook, &page));
            window.set_timeout_with_callback_and_timeout_and_arguments_0(
                deferred.unchecked_ref(),
                0,
            )?;
        }

        Ok(Self { registry })
    }

    /// Whether the page-load validation pass has run
    #[wasm_bindgen(getter, js_name = initialized)]
    pub fn initial_pass_done(&self) -> bool {
        self.registry.borrow().initial_pass_done()
    }

    #[wasm_bindgen(js_name = addForm)]
    pub fn add_form(&self, form: &JsForm) {
        self.registry.borrow_mut().add_form(form.inner.clone());
    }

    #[wasm_bindgen(js_name = validateAll)]
    pub fn validate_all(&self) {
        self.registry.borrow().validate_all();
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.registry.borrow().len()
    }
}
