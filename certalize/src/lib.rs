//! # certalize
//!
//! Core traits shared by the certalize decode pipeline.
//!
//! ## Overview
//!
//! A certificate file travels through these representations:
//! ```text
//! file bytes → (PEM armor → Base64 payload →) Vec<u8> → ByteBuffer → Header
//! ```
//!
//! Each step that turns one representation into the next implements the
//! [`decoder::Decoder`] trait, so the pipeline reads as a chain of
//! `.decode()` calls:
//!
//! ```ignore
//! use certalize::decoder::Decoder;
//!
//! let payload = PemArmor::default().strip(pem_text)?;
//! let der: Vec<u8> = payload.decode()?;
//! let buffer = ByteBuffer::from_vec(der);
//! let header: Header = buffer.decode()?;
//! ```
//!
//! Every crate in the workspace reports failures through its own error type;
//! all of them can be classified with [`ErrorKind`], which is what the
//! command-line layer turns into a process exit code.

#![forbid(unsafe_code)]

pub mod decoder;
pub mod error;

pub use error::ErrorKind;
