#![recursion_limit = "128"]
//! # Mogul Derive Macros
//!
//! This crate provides the procedural macros that generate static
//! field-descriptor tables for mogul models.
//!
//! ## Macros
//!
//! ### `Model`
//!
//! Derives `Fields`, `FieldValue`, `FilterSource` and `Model` for a struct
//! stored in its own collection.
//!
//! - **Supported for**: Structs with named fields
//! - **Struct attribute**: `#[model(collection = "...")]`, `#[model(custom_name)]`,
//!   `#[model(index(fields = "a,-b", unique, name = "..."))]`
//! - **Field attribute**: `#[field(name = "...", filter = "...", omitempty, skip, serde)]`
//!
//! # Examples
//!
//! ```rust,ignore
//! use mogul::Model;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize, Model)]
//! #[model(collection = "people", index(fields = "email", unique))]
//! pub struct Person {
//!     #[field(filter = "email")]
//!     pub email: String,
//!     #[field(filter = "age", omitempty)]
//!     pub age: i32,
//! }
//! ```
//!
//! ### `Embedded`
//!
//! Derives `Fields`, `FieldValue` and `FilterSource` for a struct nested
//! inside models. Its tagged fields become dotted filter paths.
//!
//! ```rust,ignore
//! use mogul::Embedded;
//!
//! #[derive(Default, Serialize, Deserialize, Embedded)]
//! pub struct Location {
//!     pub city: String,
//! }
//! ```
//!
//! ## Storage names
//!
//! A field is stored under `#[field(name = "...")]` if given, else under its
//! `#[serde(rename = "...")]`, else under its identifier renamed by the
//! struct's `#[serde(rename_all = "...")]`. Fields marked `#[field(skip)]` or
//! `#[serde(skip)]` are left out of the table.
//!
//! ## Serde-encoded fields
//!
//! `#[field(serde)]` encodes a field through its `Serialize` impl instead of
//! `FieldValue`, for types such as enums that have no `FieldValue` impl. It
//! is zero when it encodes to a zero bson value (null, empty string, ...).

extern crate proc_macro;
mod fields;
mod model;
mod rename;

use crate::fields::generate_fields_for_struct;
use crate::model::generate_model_for_struct;
use proc_macro::TokenStream;
use syn::{Data, DeriveInput};

/// Derives the mogul `Model` trait and the descriptor table it needs.
///
/// # Errors
///
/// Returns a compile error if:
/// - Applied to an enum, a union or a struct without named fields
/// - A `model` or `field` attribute is malformed
#[proc_macro_derive(Model, attributes(model, field))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    match ast.data {
        Data::Struct(ref data) => {
            let result = generate_fields_for_struct(&ast, data).and_then(|mut tokens| {
                tokens.extend(generate_model_for_struct(&ast)?);
                Ok(tokens)
            });
            match result {
                Ok(tokens) => TokenStream::from(tokens),
                Err(e) => {
                    let error = syn::Error::new(
                        e.span(),
                        format!(
                            "Failed to derive Model for struct '{}': {}",
                            ast.ident, e
                        ),
                    );
                    error.to_compile_error().into()
                }
            }
        }
        Data::Enum(_) => {
            let error = syn::Error::new_spanned(
                &ast,
                "Cannot derive Model for enums. Only structs with named fields are supported.",
            );
            error.to_compile_error().into()
        }
        Data::Union(_) => {
            let error = syn::Error::new_spanned(
                &ast,
                "Cannot derive Model for unions. Only structs with named fields are supported.",
            );
            error.to_compile_error().into()
        }
    }
}

/// Derives the descriptor table of a struct embedded in models.
#[proc_macro_derive(Embedded, attributes(field))]
pub fn derive_embedded(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    match ast.data {
        Data::Struct(ref data) => match generate_fields_for_struct(&ast, data) {
            Ok(tokens) => TokenStream::from(tokens),
            Err(e) => {
                let error = syn::Error::new(
                    e.span(),
                    format!(
                        "Failed to derive Embedded for struct '{}': {}",
                        ast.ident, e
                    ),
                );
                error.to_compile_error().into()
            }
        },
        _ => {
            let error = syn::Error::new_spanned(
                &ast,
                "Cannot derive Embedded for enums or unions. Only structs are supported.",
            );
            error.to_compile_error().into()
        }
    }
}
