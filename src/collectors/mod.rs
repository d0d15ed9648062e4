//! Collectors that read sensors directly rather than through [`SystemInfo`](crate::system::SystemInfo).

pub mod thermal;
