//! # Algorithms Module
//!
//! Message codecs and value normalisation. All functions are pure.

pub mod messages;
pub mod rescale;

pub use messages::{
    decode_balance_message, decode_custom_message, decode_vote_message, encode_balance_message,
    encode_custom_message, encode_vote_message, VoteMessage,
};
pub use rescale::{is_owned, rescale, result_to_uint, MAX_DECIMALS};
