use crate::parse::StructMeta;
use quote::quote;
use syn::DeriveInput;

pub fn generate(parsed: &StructMeta, input: &DeriveInput) -> proc_macro2::TokenStream {
    let name = &input.ident;
    let (impl_generics, type_generics, where_clause) = input.generics.split_for_impl();
    let size_bytes = parsed.width_bits / 8;

    let reads = parsed.fields.iter().map(|field| {
        let name = &field.name;
        let ty = &field.ty;
        let start = field.bit_offset / 8;
        let end = start + field.bits / 8;

        quote! {
            #name: <#ty as ::coe_wire::CoeRead>::read_from(
                data.get(#start..#end).ok_or(::coe_wire::WireError::TooShort {
                    need: #end,
                    have: data.len(),
                })?,
            )?
        }
    });

    let writes = parsed.fields.iter().map(|field| {
        let name = &field.name;
        let start = field.bit_offset / 8;
        let end = start + field.bits / 8;

        quote! {
            ::coe_wire::CoeWrite::write_into(&self.#name, &mut data[#start..#end]);
        }
    });

    quote! {
        impl #impl_generics ::coe_wire::CoeRead for #name #type_generics #where_clause {
            fn read_from(data: &[u8]) -> Result<Self, ::coe_wire::WireError> {
                if data.len() < #size_bytes {
                    return Err(::coe_wire::WireError::TooShort {
                        need: #size_bytes,
                        have: data.len(),
                    });
                }

                Ok(Self {
                    #(#reads),*
                })
            }
        }

        impl #impl_generics ::coe_wire::CoeWrite for #name #type_generics #where_clause {
            fn write_into(&self, data: &mut [u8]) {
                #(#writes)*
            }

            fn packed_len(&self) -> usize {
                #size_bytes
            }
        }

        impl #impl_generics ::coe_wire::CoeSized for #name #type_generics #where_clause {
            const PACKED_BITS: usize = #size_bytes * 8;
        }
    }
}
