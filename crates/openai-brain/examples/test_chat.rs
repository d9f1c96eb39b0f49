//! Simple test for OpenAiBrain chat completion.
//!
//! Run with: cargo run -p openai-brain --example test_chat
//! Or with a custom message: cargo run -p openai-brain --example test_chat -- "Your message here"
//!
//! Make sure to set environment variables in .env:
//!   OPENAI_API_KEY - OpenAI API key (or USE_GROQ=true with GROQ_API_KEY)
//!   CHAT_MODEL     - optional, defaults to llama-3.3-70b-versatile

use openai_brain::{Brain, ChatMessage, ModelOptions, OpenAiBrain};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let message_text = if args.len() > 1 {
        args[1..].join(" ")
    } else {
        "Hello! Please respond with a short greeting.".to_string()
    };

    println!("Initializing OpenAiBrain...");
    let brain = OpenAiBrain::from_env()?;

    let mut options = ModelOptions::default();
    if let Ok(model) = env::var("CHAT_MODEL") {
        options.model = model;
    }

    println!("Brain initialized: {}", brain.name());
    println!("API URL: {}", brain.config().chat_api_url);
    println!("Groq: {}", brain.config().use_groq);
    println!("Model: {}", options.model);
    println!();

    let messages = vec![
        ChatMessage::system("You are a friendly assistant. Keep replies short."),
        ChatMessage::user(&message_text),
    ];

    println!("Sending: \"{}\"", message_text);
    println!("Waiting for response...\n");

    let response = brain.complete(&messages, &options).await?;

    println!("=== Response ===");
    println!("{}", response);
    println!("================");

    Ok(())
}
