mod chunking;
mod properties;
