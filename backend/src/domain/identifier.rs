//! UUID-backed identifier newtypes shared by the domain entities.

macro_rules! define_uuid_id {
    (
        $(#[$outer:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Mint a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the inner UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ::uuid::Uuid::parse_str(s).map(Self)
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(value: ::uuid::Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

pub(crate) use define_uuid_id;

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    define_uuid_id! {
        /// Identifier used only by these tests.
        pub struct SampleId;
    }

    #[test]
    fn parses_and_displays_hyphenated_uuid() {
        let raw = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
        let id: SampleId = raw.parse().expect("valid uuid");
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!("listing-7".parse::<SampleId>().is_err());
    }

    #[test]
    fn random_ids_differ() {
        assert_ne!(SampleId::random(), SampleId::random());
    }

    #[test]
    fn converts_to_and_from_uuid() {
        let uuid = Uuid::new_v4();
        assert_eq!(Uuid::from(SampleId::from(uuid)), uuid);
    }
}
