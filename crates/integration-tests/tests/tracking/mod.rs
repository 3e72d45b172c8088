mod scoped;
