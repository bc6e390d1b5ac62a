use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, LitStr, Result};

struct IndexSpec {
    fields: Vec<String>,
    unique: bool,
    name: Option<String>,
}

pub(crate) fn generate_model_for_struct(ast: &DeriveInput) -> Result<TokenStream> {
    let name = &ast.ident;
    let type_name = name.to_string();
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let mut collection: Option<String> = None;
    let mut custom_name = false;
    let mut indexes: Vec<IndexSpec> = Vec::new();

    for attr in &ast.attrs {
        if attr.path().is_ident("model") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("collection") {
                    let s: LitStr = meta.value()?.parse()?;
                    if s.value().is_empty() {
                        return Err(meta.error("collection name must not be empty"));
                    }
                    collection = Some(s.value());
                    Ok(())
                } else if meta.path.is_ident("custom_name") {
                    custom_name = true;
                    Ok(())
                } else if meta.path.is_ident("index") {
                    let mut index = IndexSpec {
                        fields: Vec::new(),
                        unique: false,
                        name: None,
                    };
                    meta.parse_nested_meta(|meta| {
                        if meta.path.is_ident("fields") {
                            let s: LitStr = meta.value()?.parse()?;
                            index.fields = s
                                .value()
                                .split(',')
                                .map(|field| field.trim().to_string())
                                .filter(|field| !field.is_empty())
                                .collect();
                            Ok(())
                        } else if meta.path.is_ident("unique") {
                            index.unique = true;
                            Ok(())
                        } else if meta.path.is_ident("name") {
                            let s: LitStr = meta.value()?.parse()?;
                            index.name = Some(s.value());
                            Ok(())
                        } else {
                            Err(meta.error("Unknown index attribute"))
                        }
                    })?;
                    if index.fields.is_empty() {
                        return Err(meta.error("index fields are required"));
                    }
                    indexes.push(index);
                    Ok(())
                } else {
                    Err(meta.error("Unknown model attribute"))
                }
            })?;
        }
    }

    if collection.is_some() && custom_name {
        return Err(syn::Error::new_spanned(
            ast,
            "collection and custom_name cannot be combined",
        ));
    }

    let collection_name_code = if let Some(collection) = collection {
        quote! {
            fn custom_collection_name(&self) -> Option<String> {
                Some(#collection.to_string())
            }
        }
    } else if custom_name {
        quote! {
            fn custom_collection_name(&self) -> Option<String> {
                Some(mogul::model::CollectionName::collection_name(self))
            }
        }
    } else {
        quote! {}
    };

    let indexes_code = if indexes.is_empty() {
        quote! {}
    } else {
        let models: Vec<_> = indexes
            .iter()
            .map(|index| {
                let fields = &index.fields;
                let unique = index.unique;
                let with_name = match &index.name {
                    Some(name) => quote! { .with_name(#name) },
                    None => quote! {},
                };
                quote! {
                    mogul::options::IndexModel::from_fields(&[#(#fields),*], #unique) #with_name
                }
            })
            .collect();
        quote! {
            fn indexes() -> Vec<mogul::options::IndexModel> {
                vec![#(#models),*]
            }
        }
    };

    Ok(quote! {
        impl #impl_generics mogul::model::Model for #name #ty_generics #where_clause {
            fn type_name() -> &'static str {
                #type_name
            }

            #collection_name_code
            #indexes_code
        }
    })
}
