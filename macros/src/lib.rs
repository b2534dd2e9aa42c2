//! Derive macros for the todo list framework layer
//!
//! This crate provides procedural macros that remove the boilerplate of
//! wiring domain message enums and entity states into `todo-list-core`.
//!
//! # Available Macros
//!
//! - `#[derive(Command)]` - Implements `Command` (target id + command type)
//! - `#[derive(Event)]` - Implements `Event` (versioned event type names)
//! - `#[derive(State)]` - Implements `Versioned` for the `#[version]` field
//!
//! # Example
//!
//! ```ignore
//! use todo_list_macros::{Command, Event};
//!
//! #[derive(Command, Clone, Debug)]
//! #[command(target = "task_id")]
//! enum TaskCommand {
//!     CompleteTask { task_id: TaskId },
//!     ReopenTask { task_id: TaskId },
//! }
//!
//! #[derive(Event, Clone, Debug)]
//! enum TaskEvent {
//!     TaskCompleted { task_id: TaskId },
//! }
//!
//! // Generated:
//! assert_eq!(command.command_type(), "CompleteTask");
//! assert_eq!(event.event_type(), "TaskCompleted.v1");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, Variant, parse_macro_input};

/// Derive macro for command enums
///
/// Implements `todo_list_core::command::Command`:
/// - `target()` - Returns the target field of the variant
/// - `command_type()` - Returns the variant name
///
/// # Attributes
///
/// - `#[command(target = "field")]` - Names the field every variant uses to
///   address its entity. The field type becomes `Command::Target`.
///
/// # Errors
///
/// Produces a compile error if:
/// - Applied to a non-enum type or an enum without variants
/// - The `target` attribute is missing
/// - A variant has no named field called like the target
#[proc_macro_derive(Command, attributes(command))]
pub fn derive_command(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_command(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_command(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "#[derive(Command)] can only be used on enums",
        ));
    };

    if data_enum.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            input,
            "#[derive(Command)] requires at least one variant",
        ));
    }

    let target = command_target(&input.attrs)?.ok_or_else(|| {
        syn::Error::new_spanned(
            input,
            "#[derive(Command)] requires #[command(target = \"field\")]",
        )
    })?;

    let mut target_ty = None;
    let mut target_arms = Vec::new();
    let mut type_arms = Vec::new();

    for variant in &data_enum.variants {
        let variant_name = &variant.ident;
        let field = target_field(variant, &target)?;
        if target_ty.is_none() {
            target_ty = Some(field.ty.clone());
        }

        target_arms.push(quote! { Self::#variant_name { #target, .. } => #target, });

        let type_name = variant_name.to_string();
        type_arms.push(quote! { Self::#variant_name { .. } => #type_name, });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::todo_list_core::command::Command for #name #ty_generics #where_clause {
            type Target = #target_ty;

            fn target(&self) -> &Self::Target {
                match self {
                    #(#target_arms)*
                }
            }

            fn command_type(&self) -> &'static str {
                match self {
                    #(#type_arms)*
                }
            }
        }
    })
}

/// Reads `#[command(target = "...")]`
fn command_target(attrs: &[Attribute]) -> syn::Result<Option<Ident>> {
    let mut target = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("command")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("target") {
                let value: LitStr = meta.value()?.parse()?;
                target = Some(Ident::new(&value.value(), value.span()));
                Ok(())
            } else {
                Err(meta.error("unsupported command attribute, expected `target`"))
            }
        })?;
    }
    Ok(target)
}

fn target_field<'a>(variant: &'a Variant, target: &Ident) -> syn::Result<&'a syn::Field> {
    let Fields::Named(fields) = &variant.fields else {
        return Err(syn::Error::new_spanned(
            variant,
            format!("command variants must have named fields including `{target}`"),
        ));
    };

    fields
        .named
        .iter()
        .find(|field| field.ident.as_ref() == Some(target))
        .ok_or_else(|| {
            syn::Error::new_spanned(variant, format!("variant is missing the `{target}` field"))
        })
}

/// Derive macro for event enums
///
/// Implements `todo_list_core::event::Event` with `event_type()` returning
/// `"<Variant>.v1"` for every variant.
///
/// # Errors
///
/// Produces a compile error if applied to a non-enum type.
#[proc_macro_derive(Event)]
pub fn derive_event(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(&input, "#[derive(Event)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let event_type_arms = data_enum.variants.iter().map(|variant| {
        let variant_name = &variant.ident;
        let type_name = format!("{variant_name}.v1");
        match &variant.fields {
            Fields::Named(_) => quote! { Self::#variant_name { .. } => #type_name, },
            Fields::Unnamed(_) => quote! { Self::#variant_name(..) => #type_name, },
            Fields::Unit => quote! { Self::#variant_name => #type_name, },
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::todo_list_core::event::Event for #name #ty_generics #where_clause {
            fn event_type(&self) -> &'static str {
                match *self {
                    #(#event_type_arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Derive macro for entity state structs
///
/// Implements `todo_list_core::stream::Versioned` over the field marked
/// with `#[version]` (of type `todo_list_core::stream::Version`).
///
/// # Errors
///
/// Produces a compile error if:
/// - Applied to a non-struct type
/// - No field (or more than one) is marked `#[version]`
///
/// # Example
///
/// ```ignore
/// use todo_list_macros::State;
/// use todo_list_core::stream::Version;
///
/// #[derive(State, Clone, Debug, Default)]
/// struct Label {
///     pub details: LabelDetails,
///     #[version]
///     pub version: Version,
/// }
/// ```
#[proc_macro_derive(State, attributes(version))]
pub fn derive_state(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new_spanned(&input, "#[derive(State)] can only be used on structs")
            .to_compile_error()
            .into();
    };

    let mut version_fields = data_struct
        .fields
        .iter()
        .filter(|field| has_attribute(&field.attrs, "version"));

    let (Some(field), None) = (version_fields.next(), version_fields.next()) else {
        return syn::Error::new_spanned(
            &input,
            "#[derive(State)] requires exactly one field marked #[version]",
        )
        .to_compile_error()
        .into();
    };

    let Some(version_field_name) = field.ident.as_ref() else {
        return syn::Error::new_spanned(field, "#[version] requires a named field")
            .to_compile_error()
            .into();
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::todo_list_core::stream::Versioned for #name #ty_generics #where_clause {
            fn version(&self) -> ::todo_list_core::stream::Version {
                self.#version_field_name
            }

            fn set_version(&mut self, version: ::todo_list_core::stream::Version) {
                self.#version_field_name = version;
            }
        }
    };

    TokenStream::from(expanded)
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
