mod person;
mod record;

pub use person::Person;
pub use record::{Event, Hackathon, Listing, Matched};
