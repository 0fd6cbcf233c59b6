// events.rs - DOM listeners
//
// Press goes on the document so taps land even when the splash overlay
// covers the canvas. Move/release go on the canvas. Touch listeners are
// non-passive so preventDefault suppresses the emulated mouse events
// (which would otherwise register as a second tap).

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, EventTarget, MouseEvent, TouchEvent, TouchList};

use super::App;
use crate::error::{FlyupError, Result};

type Shared = Rc<RefCell<App>>;

pub fn attach(app: &Shared) -> Result<()> {
    let window = web_sys::window().ok_or(FlyupError::NoWindow)?;
    let document = window.document().ok_or(FlyupError::NoWindow)?;
    let canvas = app.borrow().surface.canvas().clone();

    // Press
    listen_mouse(&document, "mousedown", app, |app, e| {
        app.pointer_down(Some(client(e)), e.time_stamp());
    })?;
    listen_touch(&document, "touchstart", app, |app, e| {
        app.pointer_down(first_touch(&e.touches()), e.time_stamp());
    })?;

    // Drag
    listen_mouse(&canvas, "mousemove", app, |app, e| {
        app.pointer_move(Some(client(e)));
    })?;
    listen_touch(&canvas, "touchmove", app, |app, e| {
        app.pointer_move(first_touch(&e.touches()));
    })?;

    // Release
    listen_mouse(&canvas, "mouseup", app, |app, e| {
        app.pointer_up(e.time_stamp());
    })?;
    listen_touch(&canvas, "touchend", app, |app, e| {
        app.pointer_up(e.time_stamp());
    })?;
    listen_touch(&canvas, "touchcancel", app, |app, _| {
        app.pointer_cancel();
    })?;

    // Resize
    let shared = app.clone();
    let on_resize = Closure::wrap(Box::new(move |_e: Event| {
        if let Err(err) = shared.borrow_mut().resize() {
            log::warn!("resize failed: {err}");
        }
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();

    Ok(())
}

fn client(e: &MouseEvent) -> (f64, f64) {
    (e.client_x() as f64, e.client_y() as f64)
}

fn first_touch(list: &TouchList) -> Option<(f64, f64)> {
    list.item(0).map(|t| (t.client_x() as f64, t.client_y() as f64))
}

fn listen_mouse<F>(target: &EventTarget, name: &str, app: &Shared, mut f: F) -> Result<()>
where
    F: FnMut(&mut App, &MouseEvent) + 'static,
{
    let shared = app.clone();
    let closure = Closure::wrap(Box::new(move |e: MouseEvent| {
        e.prevent_default();
        f(&mut shared.borrow_mut(), &e);
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn listen_touch<F>(target: &EventTarget, name: &str, app: &Shared, mut f: F) -> Result<()>
where
    F: FnMut(&mut App, &TouchEvent) + 'static,
{
    let shared = app.clone();
    let closure = Closure::wrap(Box::new(move |e: TouchEvent| {
        e.prevent_default();
        f(&mut shared.borrow_mut(), &e);
    }) as Box<dyn FnMut(_)>);

    let opts = AddEventListenerOptions::new();
    opts.set_passive(false);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        name,
        closure.as_ref().unchecked_ref(),
        &opts,
    )?;
    closure.forget();
    Ok(())
}
