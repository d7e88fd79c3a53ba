pub mod error;
pub mod model;
pub mod provider;
pub mod registry;
pub mod water;

pub use error::{ExtractError, RegistryError};
pub use model::{
    Rates, RatesResponse, ResidentialSeasonal, ResidentialStandard, ResidentialSupplemental,
    ResidentialTou,
};
pub use provider::{ProviderCatalog, ProviderDescriptor, ProviderType, PROVIDERS_ENV};
pub use registry::{
    HtmlExtractor, ParserConfig, ParserRegistry, PdfExtractor, Registry, RegistryEntry,
    TextExtractor, Transport, WaterParserConfig, WaterParserRegistry,
};
pub use water::{SewerRateDetails, WaterRateDetails, WaterRatesResponse};
