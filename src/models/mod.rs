//! Modelos de datos
//!
//! Este módulo contiene las estructuras que mapean las tablas de MySQL.

use thiserror::Error;

/// Valor de texto que no pertenece a un enum del dominio
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("valor '{valor}' inválido para {tipo}")]
pub struct ValorInvalido {
    pub tipo: &'static str,
    pub valor: String,
}

/// Declara un enum guardado como texto (columna `ENUM`/`VARCHAR`).
///
/// Genera serde, `Display`, `FromStr` y la codificación SQLx para MySQL,
/// de modo que un valor fuera del conjunto válido falla al leerse.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::ValorInvalido;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($value => Ok($name::$variant),)+
                    otro => Err($crate::models::ValorInvalido {
                        tipo: stringify!($name),
                        valor: otro.to_string(),
                    }),
                }
            }
        }

        impl sqlx::Type<sqlx::MySql> for $name {
            fn type_info() -> sqlx::mysql::MySqlTypeInfo {
                <str as sqlx::Type<sqlx::MySql>>::type_info()
            }

            fn compatible(ty: &sqlx::mysql::MySqlTypeInfo) -> bool {
                <str as sqlx::Type<sqlx::MySql>>::compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::MySql> for $name {
            fn decode(
                value: sqlx::mysql::MySqlValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let raw = <&str as sqlx::Decode<sqlx::MySql>>::decode(value)?;
                Ok(raw.parse::<$name>()?)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::MySql> for $name {
            fn encode_by_ref(&self, buf: &mut Vec<u8>) -> sqlx::encode::IsNull {
                <&str as sqlx::Encode<sqlx::MySql>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

pub mod banner;
pub mod boletin;
pub mod empresa;
pub mod estadistica;
pub mod evento;
pub mod usuario;

pub use banner::Banner;
pub use boletin::{Boletin, EstadoBoletin};
pub use empresa::EmpresaConvenio;
pub use estadistica::{EstadisticaConfig, MetricaEstadistica};
pub use evento::{EstadoEvento, Evento, EventoAsistente, TipoEvento};
pub use usuario::{EstadoUsuario, RolUsuario, Usuario};
