use proc_macro2::Span;
use syn::{punctuated::Punctuated, Data, DeriveInput, Expr, ExprLit, Field, Lit, Meta, Token};

pub const ATTR: &str = "coe";

/// A single field, resolved to its byte range within the structural record.
pub struct FieldMeta {
    pub name: syn::Ident,
    pub ty: syn::Type,
    pub bit_offset: usize,
    pub bits: usize,
}

pub struct StructMeta {
    pub fields: Vec<FieldMeta>,
    pub width_bits: usize,
}

fn bits_attr(field: &Field) -> Result<usize, syn::Error> {
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident(ATTR)) {
        let nested = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;

        for meta in nested {
            if let Meta::NameValue(nv) = meta {
                if nv.path.is_ident("bits") {
                    if let Expr::Lit(ExprLit {
                        lit: Lit::Int(lit), ..
                    }) = &nv.value
                    {
                        return Ok(lit.base10_parse::<usize>()?);
                    }
                }
            }
        }
    }

    Err(syn::Error::new(
        field
            .ident
            .as_ref()
            .map(|i| i.span())
            .unwrap_or_else(Span::call_site),
        "every field of a `#[derive(CoeWireReadWrite)]` struct needs a `#[coe(bits = N)]` \
         attribute giving its packed bit width",
    ))
}

pub fn parse_struct(input: &DeriveInput) -> Result<StructMeta, syn::Error> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new(
            Span::call_site(),
            "`CoeWireReadWrite` can only be derived for structs with named fields",
        ));
    };

    let mut offset = 0usize;
    let mut fields = Vec::new();

    for field in &data.fields {
        let bits = bits_attr(field)?;

        if offset % 8 != 0 || bits % 8 != 0 {
            return Err(syn::Error::new(
                field
                    .ident
                    .as_ref()
                    .map(|i| i.span())
                    .unwrap_or_else(Span::call_site),
                "this derive only supports byte-aligned subitems (bit_offset and bits must \
                 both be multiples of 8); bit-packed records need a hand written codec",
            ));
        }

        fields.push(FieldMeta {
            name: field
                .ident
                .clone()
                .ok_or_else(|| syn::Error::new(Span::call_site(), "tuple structs unsupported"))?,
            ty: field.ty.clone(),
            bit_offset: offset,
            bits,
        });

        offset += bits;
    }

    Ok(StructMeta {
        fields,
        width_bits: offset,
    })
}
