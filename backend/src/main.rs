fn main() -> anyhow::Result<()> {
  gbeduflow_lib::run()
}
