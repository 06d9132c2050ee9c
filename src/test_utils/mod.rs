#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use form::{assert_form_input, assert_form_submit_button_with_text, must_get_form};
pub(crate) use html::{
    assert_valid_html, must_get_alert_message, parse_html_document, parse_html_fragment,
};
pub(crate) use http::{assert_content_type, get_header};
