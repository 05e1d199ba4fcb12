pub mod session;
pub mod temperature;
pub mod tool_handler;

pub use crate::domain::model::{
    Assistant, Coordinates, ForecastPeriod, FunctionCall, FunctionDefinition, FunctionTool,
    Location, MessageDelta, Run, Thread, ThreadMessage, ToolCall, ToolOutput,
};
pub use crate::domain::ports::{ConfigProvider, ForecastProvider, Geocoder, RequiredActionHandler};
pub use crate::utils::error::Result;
