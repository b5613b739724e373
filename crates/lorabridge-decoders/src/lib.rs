//! Uplink payload decoding.
//!
//! A decoder identifier names either a built-in decoder (looked up
//! case-insensitively in a [`DecoderRegistry`]) or the HTTP address of a
//! decoder service. [`DecoderDispatcher`] resolves the identifier, runs the
//! decoder and always yields a [`DecodeResult`]: failures are folded into
//! the result together with the original payload, so a broken decoder never
//! loses device data.
//!
//! ## Remote decoders
//!
//! A decoder service is called with
//! `GET <address>?devEUI=<id>&fport=<port>&payload=<base64>` and answers
//! with a serialized [`DecodeResult`]:
//!
//! ```json
//! {"value": 21.5}
//! {"error": "unsupported frame", "rawPayload": "AQI="}
//! ```

pub mod dispatcher;
pub mod error;
pub mod payload;
pub mod registry;
pub mod remote;
pub mod result;
pub mod value_sensor;

pub use dispatcher::{DecoderDispatcher, PayloadDecoder};
pub use error::DecodeError;
pub use payload::{RawPayload, TelemetryPayload};
pub use registry::{DecoderFn, DecoderRegistry, DecoderRegistryBuilder};
pub use remote::RemoteDecoderClient;
pub use result::{DecodeResult, DecodedValue};
pub use value_sensor::{decoder_value_sensor, DECODER_VALUE_SENSOR};
