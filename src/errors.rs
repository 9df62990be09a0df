// Create the Error, ErrorKind, ResultExt, and Result types.
// Other modules `use crate::errors::*;` to get at everything `error_chain!` creates.
use error_chain::*;

error_chain! {

    foreign_links {
        Io(::std::io::Error);
        ConfigParse(::toml::de::Error);
    }

    errors {
        InvalidWallThreshold(threshold: f64) {
            description("wall threshold outside [0, 1]")
            display("wall threshold must be a finite value within [0, 1], got {}", threshold)
        }
        InvalidGridData(reason: String) {
            description("invalid occupancy grid data")
            display("invalid occupancy grid data: {}", reason)
        }
    }
}
