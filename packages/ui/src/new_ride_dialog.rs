use chrono::{Local, NaiveDateTime, TimeZone, Utc};
use dioxus::prelude::*;
use store::{NewRide, Ride};

use crate::components::{Button, ButtonVariant, Input, Label};
use crate::listings::create_listing;
use crate::session::use_session;
use crate::toast::use_toasts;

const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Raw values of the ride form, as typed.
#[derive(Clone, Debug, PartialEq)]
pub struct RideForm {
    pub origin: String,
    pub destination: String,
    /// `datetime-local` input value, in the member's timezone.
    pub departure: String,
    pub seats: String,
    pub price: String,
    pub notes: String,
}

impl Default for RideForm {
    fn default() -> Self {
        Self {
            origin: String::new(),
            destination: String::new(),
            departure: String::new(),
            seats: "1".to_string(),
            price: "0".to_string(),
            notes: String::new(),
        }
    }
}

impl RideForm {
    pub fn to_draft(&self) -> Result<NewRide, String> {
        let origin = self.origin.trim();
        let destination = self.destination.trim();
        if origin.is_empty() || destination.is_empty() {
            return Err("Origin and destination are required".to_string());
        }
        let naive = NaiveDateTime::parse_from_str(self.departure.trim(), DATETIME_INPUT_FORMAT)
            .map_err(|_| "Pick a departure date and time".to_string())?;
        let departure_time = Local
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| "That time does not exist in your timezone".to_string())?
            .with_timezone(&Utc);
        let seats_available: u32 = self
            .seats
            .trim()
            .parse()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| "Offer at least one seat".to_string())?;
        let price: f64 = self
            .price
            .trim()
            .parse()
            .ok()
            .filter(|p: &f64| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| "Price must be zero or more".to_string())?;
        let notes = self.notes.trim();
        Ok(NewRide {
            origin: origin.to_string(),
            destination: destination.to_string(),
            departure_time,
            seats_available,
            price,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

/// Inline form for offering a new ride.
#[component]
pub fn NewRideDialog(on_created: EventHandler<Ride>, on_cancel: EventHandler<()>) -> Element {
    let handle = use_session();
    let toasts = use_toasts();
    let busy = use_signal(|| false);
    let mut form = use_signal(RideForm::default);
    let mut error = use_signal(|| None::<String>);

    let handle_submit = move |_| match form().to_draft() {
        Ok(draft) => {
            error.set(None);
            create_listing::<Ride>(handle.clone(), toasts, busy, draft, on_created);
        }
        Err(message) => error.set(Some(message)),
    };

    rsx! {
        div {
            class: "dialog-body",
            h2 { class: "dialog-title", "Offer a ride" }

            div {
                class: "form-row",
                div {
                    class: "form-field",
                    Label { html_for: "ride-origin", "From" }
                    Input {
                        id: "ride-origin",
                        value: form().origin,
                        oninput: move |evt: FormEvent| form.write().origin = evt.value(),
                    }
                }
                div {
                    class: "form-field",
                    Label { html_for: "ride-destination", "To" }
                    Input {
                        id: "ride-destination",
                        value: form().destination,
                        oninput: move |evt: FormEvent| form.write().destination = evt.value(),
                    }
                }
            }

            div {
                class: "form-field",
                Label { html_for: "ride-departure", "Departure" }
                Input {
                    id: "ride-departure",
                    input_type: "datetime-local",
                    value: form().departure,
                    oninput: move |evt: FormEvent| form.write().departure = evt.value(),
                }
            }

            div {
                class: "form-row",
                div {
                    class: "form-field",
                    Label { html_for: "ride-seats", "Seats" }
                    Input {
                        id: "ride-seats",
                        input_type: "number",
                        value: form().seats,
                        oninput: move |evt: FormEvent| form.write().seats = evt.value(),
                    }
                }
                div {
                    class: "form-field",
                    Label { html_for: "ride-price", "Price" }
                    Input {
                        id: "ride-price",
                        input_type: "number",
                        value: form().price,
                        oninput: move |evt: FormEvent| form.write().price = evt.value(),
                    }
                }
            }

            div {
                class: "form-field",
                Label { html_for: "ride-notes", "Notes" }
                textarea {
                    id: "ride-notes",
                    class: "input",
                    value: "{form().notes}",
                    oninput: move |evt: FormEvent| form.write().notes = evt.value(),
                }
            }

            if let Some(message) = error() {
                p { class: "form-error", role: "alert", "{message}" }
            }

            div {
                class: "dialog-actions",
                Button {
                    variant: ButtonVariant::Outline,
                    disabled: busy(),
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
                Button {
                    variant: ButtonVariant::Primary,
                    disabled: busy(),
                    onclick: handle_submit,
                    if busy() { "Posting..." } else { "Post ride" }
                }
            }
        }
    }
}
