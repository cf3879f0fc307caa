mod resolution;
mod boundary;

pub use self::resolution::Contact;
