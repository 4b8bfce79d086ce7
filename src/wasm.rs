//! WebAssembly bindings for glyphtype

use crate::{
    Converter, GenerationResult, ImageDecoder, NativeDecoder, PixelBuffer, Settings, Source,
};
use wasm_bindgen::prelude::*;

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct WasmGenerator {
    converter: Converter,
}

#[wasm_bindgen]
impl WasmGenerator {
    /// Create a generator from a settings JSON document
    ///
    /// # Arguments
    /// * `settings_json` - camelCase settings, e.g. `{"glyphColor": "#7ED957", ...}`
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str) -> Result<WasmGenerator, JsValue> {
        let settings = Settings::from_json_str(settings_json).map_err(to_js)?;
        let converter = Converter::new(settings).map_err(to_js)?;
        Ok(WasmGenerator { converter })
    }

    /// Generator using the default settings
    #[wasm_bindgen]
    pub fn with_defaults() -> Result<WasmGenerator, JsValue> {
        let converter = Converter::new(Settings::default()).map_err(to_js)?;
        Ok(WasmGenerator { converter })
    }

    #[wasm_bindgen]
    pub fn set_seed(self, seed: u64) -> WasmGenerator {
        WasmGenerator { converter: self.converter.with_seed(seed) }
    }

    /// Convert an RGBA read-back from a canvas (`getImageData().data`)
    #[wasm_bindgen]
    pub fn generate_rgba(
        &self,
        image_data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<js_sys::Object, JsValue> {
        let buffer = PixelBuffer::from_rgba(width, height, image_data.to_vec()).map_err(to_js)?;
        result_object(self.converter.convert(&buffer))
    }

    /// Convert SVG markup text
    #[wasm_bindgen]
    pub fn generate_markup(&self, markup: &str) -> Result<js_sys::Object, JsValue> {
        let buffer = NativeDecoder.decode(&Source::Markup(markup)).map_err(|e| {
            web_sys::console::warn_1(&format!("glyphtype: {e}").into());
            to_js(e)
        })?;
        result_object(self.converter.convert(&buffer))
    }
}

/// `{ svgContent, width, height }`
fn result_object(result: GenerationResult) -> Result<js_sys::Object, JsValue> {
    let object = js_sys::Object::new();
    js_sys::Reflect::set(&object, &"svgContent".into(), &result.svg_content.into())?;
    js_sys::Reflect::set(&object, &"width".into(), &result.width.into())?;
    js_sys::Reflect::set(&object, &"height".into(), &result.height.into())?;
    Ok(object)
}
