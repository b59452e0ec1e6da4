//! Leaflet Bindings
//!
//! Thin `wasm-bindgen` view of the global `L` plus the `MapSurface` the view
//! state draws through. Popup buttons and drag handlers are closures owned by
//! each marker entry, so they go away with the marker.

use std::collections::HashMap;

use js_sys::{Array, Function, Object, Reflect};
use leptos::prelude::*;
use pin_sync::{Coords, MapSurface, MarkerIcon, Pin, PinId};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlButtonElement, HtmlElement, HtmlTextAreaElement, MouseEvent};

use crate::config::MapConfig;

#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    pub type Map;

    #[wasm_bindgen(js_namespace = L, js_name = map)]
    fn create_map(element: &HtmlElement, options: &JsValue) -> Map;

    #[wasm_bindgen(method, js_name = fitBounds)]
    pub fn fit_bounds(this: &Map, bounds: &JsValue) -> Map;

    #[wasm_bindgen(method, js_name = setView)]
    pub fn set_view(this: &Map, center: &JsValue, zoom: f64) -> Map;

    #[wasm_bindgen(method, js_name = getZoom)]
    pub fn get_zoom(this: &Map) -> f64;

    #[wasm_bindgen(method, js_name = closePopup)]
    pub fn close_popup(this: &Map) -> Map;

    #[wasm_bindgen(method, js_name = removeLayer)]
    pub fn remove_layer(this: &Map, layer: &JsValue) -> Map;

    #[wasm_bindgen(method, js_name = invalidateSize)]
    pub fn invalidate_size(this: &Map) -> Map;

    #[wasm_bindgen(method, js_name = on)]
    pub fn on(this: &Map, event: &str, handler: &Function) -> Map;

    #[wasm_bindgen(method, getter)]
    pub fn dragging(this: &Map) -> Handler;

    pub type Handler;

    #[wasm_bindgen(method)]
    pub fn enable(this: &Handler);

    #[wasm_bindgen(method)]
    pub fn disable(this: &Handler);

    pub type ImageOverlay;

    #[wasm_bindgen(js_namespace = L, js_name = imageOverlay)]
    fn create_image_overlay(url: &str, bounds: &JsValue) -> ImageOverlay;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &ImageOverlay, map: &Map) -> ImageOverlay;

    #[derive(Debug, Clone)]
    pub type Marker;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn create_marker(latlng: &JsValue, options: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Marker, map: &Map) -> Marker;

    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &Marker, content: &HtmlElement) -> Marker;

    #[wasm_bindgen(method, js_name = setLatLng)]
    fn set_lat_lng(this: &Marker, latlng: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = getLatLng)]
    fn get_lat_lng(this: &Marker) -> JsValue;

    #[wasm_bindgen(method, js_name = setIcon)]
    fn set_icon(this: &Marker, icon: &DivIcon) -> Marker;

    #[wasm_bindgen(method, js_name = openPopup)]
    fn open_popup(this: &Marker) -> Marker;

    #[wasm_bindgen(method, js_name = on)]
    fn on(this: &Marker, event: &str, handler: &Function) -> Marker;

    pub type DivIcon;

    #[wasm_bindgen(js_namespace = L, js_name = divIcon)]
    fn create_div_icon(options: &JsValue) -> DivIcon;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DivIconOptions<'a> {
    class_name: &'a str,
    html: String,
    icon_size: [u32; 2],
    icon_anchor: [i32; 2],
    popup_anchor: [i32; 2],
}

fn div_icon(icon: &MarkerIcon) -> Result<DivIcon, JsValue> {
    let options = serde_wasm_bindgen::to_value(&DivIconOptions {
        class_name: &icon.class_name,
        html: icon.html(),
        icon_size: icon.size,
        icon_anchor: icon.anchor,
        popup_anchor: icon.popup_anchor,
    })?;
    Ok(create_div_icon(&options))
}

/// `[lat, lng]`, which Leaflet accepts anywhere a LatLng is expected
fn lat_lng(coords: Coords) -> JsValue {
    Array::of2(&coords.lat.into(), &coords.lng.into()).into()
}

/// Read a Leaflet LatLng (or anything with `lat`/`lng`)
fn coords_of(latlng: &JsValue) -> Option<Coords> {
    let lat = Reflect::get(latlng, &"lat".into()).ok()?.as_f64()?;
    let lng = Reflect::get(latlng, &"lng".into()).ok()?.as_f64()?;
    Some(Coords::new(lat, lng))
}

/// `L.CRS.Simple`: pixel coordinates of the map image
fn simple_crs() -> Result<JsValue, JsValue> {
    let leaflet = Reflect::get(&js_sys::global(), &"L".into())?;
    let crs = Reflect::get(&leaflet, &"CRS".into())?;
    Reflect::get(&crs, &"Simple".into())
}

/// Create the map on `element` with the image as its only layer
pub fn mount_map(element: &HtmlElement, config: &MapConfig) -> Result<Map, JsValue> {
    let options = Object::new();
    Reflect::set(&options, &"crs".into(), &simple_crs()?)?;
    Reflect::set(&options, &"minZoom".into(), &config.min_zoom.into())?;
    let map = create_map(element, &options);

    let bounds = serde_wasm_bindgen::to_value(&config.bounds())?;
    create_image_overlay(&config.image_url, &bounds).add_to(&map);
    map.fit_bounds(&bounds);
    Ok(map)
}

/// Route map clicks (with their image coordinates) to `handler`
pub fn on_map_click(map: &Map, mut handler: impl FnMut(Coords) + 'static) {
    let listener = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
        let latlng = Reflect::get(&event, &"latlng".into()).unwrap_or(JsValue::UNDEFINED);
        if let Some(coords) = coords_of(&latlng) {
            handler(coords);
        }
    });
    map.on("click", listener.as_ref().unchecked_ref());
    // The map lives as long as the page
    listener.forget();
}

/// What marker interactions do; each receives the pin's id
#[derive(Clone, Copy)]
pub struct PinActions {
    pub on_move: Callback<(PinId, Coords)>,
    pub on_save_note: Callback<(PinId, String)>,
    pub on_delete: Callback<PinId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(u32);

struct PopupBody {
    root: HtmlElement,
    title: HtmlElement,
    note: HtmlTextAreaElement,
    _on_save: Closure<dyn FnMut(MouseEvent)>,
    _on_delete: Closure<dyn FnMut(MouseEvent)>,
}

impl PopupBody {
    fn build(id: &PinId, pin: &Pin, map: &Map, actions: PinActions) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let root: HtmlElement = document.create_element("div")?.dyn_into()?;
        root.set_class_name("pin-popup");

        let title: HtmlElement = document.create_element("h3")?.dyn_into()?;
        title.set_text_content(Some(&pin.title));

        let note: HtmlTextAreaElement = document.create_element("textarea")?.dyn_into()?;
        note.set_value(&pin.note);

        let save: HtmlButtonElement = document.create_element("button")?.dyn_into()?;
        save.set_text_content(Some("Save Note"));
        save.set_class_name("western-button");

        let delete: HtmlButtonElement = document.create_element("button")?.dyn_into()?;
        delete.set_text_content(Some("Delete Pin"));
        delete.set_class_name("western-button");

        let on_save = {
            let id = id.clone();
            let note = note.clone();
            let map = map.clone();
            Closure::<dyn FnMut(MouseEvent)>::new(move |_: MouseEvent| {
                actions.on_save_note.run((id.clone(), note.value()));
                map.close_popup();
            })
        };
        save.add_event_listener_with_callback("click", on_save.as_ref().unchecked_ref())?;

        let on_delete = {
            let id = id.clone();
            let title = title.clone();
            Closure::<dyn FnMut(MouseEvent)>::new(move |_: MouseEvent| {
                let name = title.text_content().unwrap_or_default();
                let confirmed = web_sys::window()
                    .and_then(|w| w.confirm_with_message(&format!("Are you sure you want to delete \"{}\"?", name)).ok())
                    .unwrap_or(false);
                if confirmed {
                    actions.on_delete.run(id.clone());
                }
            })
        };
        delete.add_event_listener_with_callback("click", on_delete.as_ref().unchecked_ref())?;

        root.append_child(&title)?;
        root.append_child(&note)?;
        root.append_child(&save)?;
        root.append_child(&delete)?;

        Ok(Self {
            root,
            title,
            note,
            _on_save: on_save,
            _on_delete: on_delete,
        })
    }

    fn refresh(&self, pin: &Pin) {
        self.title.set_text_content(Some(&pin.title));
        // Leave the textarea alone unless the note really changed
        if self.note.value() != pin.note {
            self.note.set_value(&pin.note);
        }
    }
}

struct MarkerEntry {
    marker: Marker,
    popup: PopupBody,
    _on_drag_end: Closure<dyn FnMut(JsValue)>,
}

/// Leaflet-backed marker layer
pub struct LeafletSurface {
    map: Map,
    actions: PinActions,
    markers: HashMap<MarkerHandle, MarkerEntry>,
    next_handle: u32,
}

impl LeafletSurface {
    pub fn new(map: Map, actions: PinActions) -> Self {
        Self {
            map,
            actions,
            markers: HashMap::new(),
            next_handle: 0,
        }
    }

    fn build_entry(&self, id: &PinId, pin: &Pin, icon: &MarkerIcon) -> Result<MarkerEntry, JsValue> {
        let options = Object::new();
        Reflect::set(&options, &"icon".into(), &div_icon(icon)?.into())?;
        Reflect::set(&options, &"draggable".into(), &JsValue::TRUE)?;

        let marker = create_marker(&lat_lng(pin.coords), &options);
        let popup = PopupBody::build(id, pin, &self.map, self.actions)?;
        marker.add_to(&self.map).bind_popup(&popup.root);

        let on_drag_end = {
            let id = id.clone();
            let dragged = marker.clone();
            let actions = self.actions;
            Closure::<dyn FnMut(JsValue)>::new(move |_: JsValue| {
                if let Some(coords) = coords_of(&dragged.get_lat_lng()) {
                    actions.on_move.run((id.clone(), coords));
                }
            })
        };
        marker.on("dragend", on_drag_end.as_ref().unchecked_ref());

        Ok(MarkerEntry {
            marker,
            popup,
            _on_drag_end: on_drag_end,
        })
    }
}

impl MapSurface for LeafletSurface {
    type Marker = MarkerHandle;

    fn place_marker(&mut self, id: &PinId, pin: &Pin, icon: &MarkerIcon) -> Option<MarkerHandle> {
        match self.build_entry(id, pin, icon) {
            Ok(entry) => {
                self.next_handle += 1;
                let handle = MarkerHandle(self.next_handle);
                self.markers.insert(handle, entry);
                Some(handle)
            }
            Err(e) => {
                log::error!("could not draw marker for pin {}: {:?}", id, e);
                None
            }
        }
    }

    fn update_marker(&mut self, marker: &MarkerHandle, pin: &Pin, icon: &MarkerIcon) {
        let Some(entry) = self.markers.get(marker) else {
            return;
        };
        entry.marker.set_lat_lng(&lat_lng(pin.coords));
        match div_icon(icon) {
            Ok(div) => {
                entry.marker.set_icon(&div);
            }
            Err(e) => log::error!("could not build icon {}: {:?}", icon.class_name, e),
        }
        entry.popup.refresh(pin);
    }

    fn remove_marker(&mut self, marker: MarkerHandle) {
        if let Some(entry) = self.markers.remove(&marker) {
            self.map.remove_layer(&entry.marker);
        }
    }

    fn focus_marker(&self, marker: &MarkerHandle) {
        if let Some(entry) = self.markers.get(marker) {
            entry.marker.open_popup();
            self.map.set_view(&entry.marker.get_lat_lng(), self.map.get_zoom());
        }
    }

    fn set_panning(&self, enabled: bool) {
        let dragging = self.map.dragging();
        if enabled {
            dragging.enable();
        } else {
            dragging.disable();
        }
    }
}
