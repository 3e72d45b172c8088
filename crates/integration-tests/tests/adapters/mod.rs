mod anthropic;
mod blocking;
mod google;
mod openai;
