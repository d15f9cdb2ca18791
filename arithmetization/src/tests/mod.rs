mod connectedness;
mod lookup;
