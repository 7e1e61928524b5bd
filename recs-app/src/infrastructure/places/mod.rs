mod dto;
mod google;
mod openstreetmap;

pub use google::GooglePlacesClient;
pub use openstreetmap::NominatimClient;
