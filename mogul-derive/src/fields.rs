use proc_macro2::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{DataStruct, DeriveInput, Expr, ExprLit, Field, Lit, LitStr, Meta, Result, Token};

use crate::rename::RenameRule;

/// One stored field as declared on the struct.
struct FieldSpec<'a> {
    ident: &'a syn::Ident,
    storage_name: String,
    filter_tag: Option<String>,
    omit_empty: bool,
    via_serde: bool,
}

pub(crate) fn generate_fields_for_struct(
    ast: &DeriveInput,
    data: &DataStruct,
) -> Result<TokenStream> {
    let fields: Vec<&Field> = match &data.fields {
        syn::Fields::Named(fields) => fields.named.iter().collect(),
        _ => {
            return Err(syn::Error::new_spanned(
                ast,
                "only structs with named fields are supported",
            ))
        }
    };

    let rename_rule = container_rename_rule(ast)?;
    let mut specs = Vec::with_capacity(fields.len());
    for field in fields {
        if let Some(spec) = parse_field(field, rename_rule)? {
            specs.push(spec);
        }
    }

    let rows = specs.iter().map(|spec| {
        let ident = spec.ident;
        let storage_name = &spec.storage_name;
        let omit_empty = spec.omit_empty;
        let filter_tag = match &spec.filter_tag {
            Some(tag) => quote! { Some(#tag) },
            None => quote! { None },
        };
        if spec.via_serde {
            quote! {
                mogul::model::ModelField::serialized(#storage_name, #filter_tag, #omit_empty, &self.#ident)
            }
        } else {
            quote! {
                mogul::model::ModelField::new(#storage_name, #filter_tag, #omit_empty, &self.#ident)
            }
        }
    });

    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics mogul::model::Fields for #name #ty_generics #where_clause {
            fn fields(&self) -> Vec<mogul::model::ModelField<'_>> {
                vec![#(#rows),*]
            }
        }

        impl #impl_generics mogul::model::FieldValue for #name #ty_generics #where_clause {
            fn to_bson(&self) -> mogul::errors::MogulResult<mogul::bson::Bson> {
                Ok(mogul::bson::Bson::Document(mogul::model::fields_to_document(
                    &mogul::model::Fields::fields(self),
                )?))
            }

            fn is_zero(&self) -> bool {
                mogul::model::all_zero(&mogul::model::Fields::fields(self))
            }

            fn kind(&self) -> mogul::model::FieldKind {
                mogul::model::FieldKind::Struct
            }

            fn nested_fields(&self) -> Option<Vec<mogul::model::ModelField<'_>>> {
                Some(mogul::model::Fields::fields(self))
            }
        }

        impl #impl_generics mogul::filter::FilterSource for #name #ty_generics #where_clause {
            fn filter_entries(
                &self,
            ) -> mogul::errors::MogulResult<Vec<(String, mogul::bson::Bson)>> {
                mogul::model::extract_filter(&mogul::model::Fields::fields(self))
            }
        }
    })
}

/// The container's `#[serde(rename_all = "...")]`, or its serialize half.
fn container_rename_rule(ast: &DeriveInput) -> Result<Option<RenameRule>> {
    let mut rule = None;
    for attr in &ast.attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        // other serde options are none of our business
        let Ok(metas) = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
        else {
            continue;
        };
        for meta in metas {
            match meta {
                Meta::NameValue(nv) if nv.path.is_ident("rename_all") => {
                    if let Expr::Lit(ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    {
                        rule = Some(RenameRule::parse(s)?);
                    }
                }
                Meta::List(list) if list.path.is_ident("rename_all") => {
                    list.parse_nested_meta(|meta| {
                        let s: LitStr = meta.value()?.parse()?;
                        if meta.path.is_ident("serialize") {
                            rule = Some(RenameRule::parse(&s)?);
                        }
                        Ok(())
                    })?;
                }
                _ => {}
            }
        }
    }
    Ok(rule)
}

fn parse_field(field: &Field, rename_rule: Option<RenameRule>) -> Result<Option<FieldSpec<'_>>> {
    let Some(ident) = field.ident.as_ref() else {
        return Err(syn::Error::new_spanned(field, "field has no name"));
    };

    let mut storage_name: Option<String> = None;
    let mut serde_name: Option<String> = None;
    let mut filter_tag: Option<String> = None;
    let mut omit_empty = false;
    let mut skip = false;
    let mut via_serde = false;

    for attr in &field.attrs {
        if attr.path().is_ident("field") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let s: LitStr = meta.value()?.parse()?;
                    storage_name = Some(s.value());
                    Ok(())
                } else if meta.path.is_ident("filter") {
                    let s: LitStr = meta.value()?.parse()?;
                    filter_tag = Some(s.value());
                    Ok(())
                } else if meta.path.is_ident("omitempty") {
                    omit_empty = true;
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else if meta.path.is_ident("serde") {
                    via_serde = true;
                    Ok(())
                } else {
                    Err(meta.error("Unknown field attribute"))
                }
            })?;
        } else if attr.path().is_ident("serde") {
            // other serde options are none of our business
            let metas = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
            for meta in metas {
                match meta {
                    Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                        if let Expr::Lit(ExprLit {
                            lit: Lit::Str(s), ..
                        }) = &nv.value
                        {
                            serde_name = Some(s.value());
                        }
                    }
                    Meta::Path(path) if path.is_ident("skip") => skip = true,
                    _ => {}
                }
            }
        }
    }

    if skip {
        return Ok(None);
    }

    let storage_name = storage_name.or(serde_name).unwrap_or_else(|| {
        let name = ident.to_string().trim_start_matches("r#").to_string();
        match rename_rule {
            Some(rule) => rule.apply_to_field(&name),
            None => name,
        }
    });

    Ok(Some(FieldSpec {
        ident,
        storage_name,
        filter_tag,
        omit_empty,
        via_serde,
    }))
}
