//! Helper macro for generating driven-port error enums.
//!
//! Each variant gets a snake-case constructor accepting `impl Into<T>` for its
//! fields, plus a `kind` accessor that yields the variant name for structured
//! log fields.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (@pattern $variant:ident) => { Self::$variant };
    (@pattern $variant:ident { $($field:ident : $ty:ty),* }) => { Self::$variant { .. } };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*

            /// Snake-case variant name, suitable for log fields.
            #[must_use]
            pub fn kind(&self) -> &'static str {
                ::paste::paste! {
                    match self {
                        $(
                            define_port_error!(@pattern $variant $( { $($field : $ty),* } )?) =>
                                stringify!([<$variant:snake>]),
                        )*
                    }
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum LedgerPortError {
            Connection { message: String } => "ledger connection failed: {message}",
            Missing { id: u32 } => "listing {id} missing",
            Conflict { message: String, id: u32 } => "listing {id} conflict: {message}",
            Closed => "listing already closed",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = LedgerPortError::connection("refused");
        assert_eq!(err.to_string(), "ledger connection failed: refused");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        assert_eq!(LedgerPortError::missing(7_u32).to_string(), "listing 7 missing");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = LedgerPortError::conflict("raced", 3_u32);
        assert_eq!(err.to_string(), "listing 3 conflict: raced");
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(LedgerPortError::closed(), LedgerPortError::Closed);
    }

    #[test]
    fn kind_names_the_variant() {
        assert_eq!(LedgerPortError::connection("x").kind(), "connection");
        assert_eq!(LedgerPortError::closed().kind(), "closed");
    }
}
