pub(crate) mod format;

pub(crate) use format::{format_age, mask_key};
