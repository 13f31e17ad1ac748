//! DashScope (Alibaba Bailian) integration.

mod client;
mod dto;

pub use client::DashScopeClient;
pub use dto::{
    DashScopeTaskStatus, ImageSynthesisInput, ImageSynthesisParameters, ImageSynthesisRequest,
    ImageSynthesisRequestBuilder, SpeechInput, SpeechParameters, SpeechParametersBuilder,
    SpeechRequest, TaskOutput, TaskQueryResponse, TaskResult, TaskSubmitResponse,
};
