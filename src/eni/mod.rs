//! Read-only, navigable access to a parsed ENI document (spec §3, §4.2).

mod cyclic;
mod document;
mod error;
mod master;
mod pdo;
mod process_image;
mod slave;

pub use cyclic::Cyclic;
pub use document::Configuration;
pub use error::EniError;
pub use master::Master;
pub use pdo::{Direction, Pdo, PdoEntry};
pub use process_image::{ProcessImage, ProcessImageVariable};
pub use slave::{Slave, SlaveData};

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_ENI: &str = r#"
        <EtherCATConfig>
          <Config>
            <Master><Name>MainMaster</Name></Master>
            <Slave>
              <Info>
                <Name>Drive1</Name>
                <PhysAddr>#x1001</PhysAddr>
                <AutoIncAddr>0</AutoIncAddr>
              </Info>
              <ProcessData>
                <RxPdo>
                  <Index>#x1600</Index>
                  <Name>RxPDO</Name>
                  <SmNo>2</SmNo>
                  <Entry>
                    <Index>#x6040</Index>
                    <SubIndex>0</SubIndex>
                    <BitLen>16</BitLen>
                    <Name>ControlWord</Name>
                    <DataType>UINT</DataType>
                  </Entry>
                </RxPdo>
                <TxPdo>
                  <Index>#x1a00</Index>
                  <Name>TxPDO</Name>
                  <SmNo>3</SmNo>
                  <Entry>
                    <Index>#x6041</Index>
                    <SubIndex>0</SubIndex>
                    <BitLen>16</BitLen>
                    <Name>StatusWord</Name>
                    <DataType>UINT</DataType>
                  </Entry>
                </TxPdo>
              </ProcessData>
            </Slave>
            <ProcessImage>
              <Inputs>
                <ByteSize>2</ByteSize>
                <Variable>
                  <Name>Drive1.TxPDO.StatusWord</Name>
                  <BitSize>16</BitSize>
                  <BitOffs>0</BitOffs>
                  <DataType>UINT</DataType>
                </Variable>
              </Inputs>
              <Outputs>
                <ByteSize>2</ByteSize>
                <Variable>
                  <Name>Drive1.RxPDO.ControlWord</Name>
                  <BitSize>16</BitSize>
                  <BitOffs>0</BitOffs>
                  <DataType>UINT</DataType>
                </Variable>
              </Outputs>
            </ProcessImage>
            <Cyclic><CycleTime>1000</CycleTime></Cyclic>
          </Config>
        </EtherCATConfig>
    "#;

    #[test]
    fn parses_master_and_slave() {
        let config = Configuration::from_string(SAMPLE_ENI).unwrap();
        assert_eq!(config.get_master().name(), "MainMaster");

        let slave = config.get_slave("Drive1").unwrap();
        assert_eq!(slave.get_fixed_addr(), 0x1001);
        assert_eq!(slave.get_topological_addr(), 1);
        assert!(slave.has_pdo("RxPDO"));
        assert!(slave.has_pdo("TxPDO"));
    }

    #[test]
    fn autonomize_survives_configuration_drop() {
        let owned = {
            let config = Configuration::from_string(SAMPLE_ENI).unwrap();
            config.get_slave("Drive1").unwrap().autonomize()
        };
        assert_eq!(owned.name(), "Drive1");
        assert_eq!(owned.get_pdo_entry("ControlWord").unwrap().bit_len, 16);
    }

    #[test]
    fn process_image_lookup_by_fully_qualified_name() {
        let config = Configuration::from_string(SAMPLE_ENI).unwrap();
        let pi = config.get_process_image();
        assert_eq!(pi.input_bits(), 16);
        assert_eq!(pi.output_bits(), 16);

        let var = pi.get_variable("Drive1.TxPDO.StatusWord").unwrap();
        assert_eq!(var.bit_size, 16);
        assert_eq!(var.slave_name.as_deref(), Some("Drive1"));
    }

    #[test]
    fn missing_master_is_malformed() {
        let result = Configuration::from_string("<EtherCATConfig><Config/></EtherCATConfig>");
        assert!(matches!(result, Err(EniError::Malformed { .. })));
    }
}
