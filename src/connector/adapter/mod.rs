mod bedrock_chat;

pub use bedrock_chat::*;
