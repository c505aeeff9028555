//! VPC network declarations
//!
//! One VPC with three subnet tiers (public, private-with-egress, isolated)
//! replicated across the configured number of availability zones, a web and
//! a database security group, and gateway endpoints for S3 and DynamoDB
//! routed through the private tier.

use crate::cidr::CidrBlock;
use crate::error::{Result, SynthError};
use crate::naming::logical_id;
use crate::stack::Stack;
use crate::template::{self, Output, Resource};
use serde_json::json;
use skyform_config::VpcConfig;
use tracing::info;

const SUBNET_PREFIX: u8 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubnetTier {
    Public,
    Private,
    Isolated,
}

impl SubnetTier {
    const ALL: [SubnetTier; 3] = [SubnetTier::Public, SubnetTier::Private, SubnetTier::Isolated];

    fn label(&self) -> &'static str {
        match self {
            SubnetTier::Public => "public",
            SubnetTier::Private => "private",
            SubnetTier::Isolated => "isolated",
        }
    }
}

/// Builds the VPC resources for one environment
pub struct NetworkBuilder<'a> {
    env_name: &'a str,
    cfg: &'a VpcConfig,
}

impl<'a> NetworkBuilder<'a> {
    /// Fails when the environment carries no `vpc` section
    pub fn new(env_name: &'a str, cfg: Option<&'a VpcConfig>) -> Result<Self> {
        let cfg = cfg.ok_or_else(|| SynthError::MissingNetworkConfig(env_name.to_string()))?;
        Ok(Self { env_name, cfg })
    }

    pub fn build(&self, stack: &mut Stack) -> Result<()> {
        if self.cfg.max_azs == 0 {
            return Err(SynthError::InvalidConfig(
                "vpc.max_azs must be at least 1".to_string(),
            ));
        }

        let vpc_cidr: CidrBlock = self.cfg.cidr.parse()?;
        let env = self.env_name;
        let region = stack.env().region.clone();

        let vpc_id = logical_id(&format!("vpc-{env}"));
        stack.add_resource(
            &vpc_id,
            Resource::new(
                "AWS::EC2::VPC",
                json!({
                    "CidrBlock": self.cfg.cidr,
                    "EnableDnsSupport": self.cfg.enable_dns_support,
                    "EnableDnsHostnames": self.cfg.enable_dns_hostnames,
                    "Tags": [ { "Key": "Name", "Value": format!("vpc-{env}") } ]
                }),
            ),
        );

        let igw_id = logical_id(&format!("igw-{env}"));
        stack.add_resource(
            &igw_id,
            Resource::new("AWS::EC2::InternetGateway", json!({})),
        );

        let attachment_id = format!("{igw_id}Attachment");
        stack.add_resource(
            &attachment_id,
            Resource::new(
                "AWS::EC2::VPCGatewayAttachment",
                json!({
                    "VpcId": template::reference(&vpc_id),
                    "InternetGatewayId": template::reference(&igw_id)
                }),
            )
            .untagged(),
        );

        let mut public_subnets = Vec::new();
        let mut private_subnets = Vec::new();
        let mut private_route_tables = Vec::new();

        // /24 blocks are allocated tier-major: all public subnets first,
        // then private, then isolated, AZ-minor within a tier.
        let mut block_index = 0u32;
        for tier in SubnetTier::ALL {
            for az in 0..self.cfg.max_azs {
                let block = vpc_cidr.subnet(SUBNET_PREFIX, block_index)?;
                block_index += 1;

                let subnet_name = format!("{}-subnet-{env}-az{}", tier.label(), az + 1);
                let subnet_id = logical_id(&subnet_name);

                let mut properties = json!({
                    "VpcId": template::reference(&vpc_id),
                    "CidrBlock": block.to_string(),
                    "AvailabilityZone": template::select(az, template::get_azs()),
                    "Tags": [ { "Key": "Name", "Value": subnet_name } ]
                });
                if tier == SubnetTier::Public {
                    properties["MapPublicIpOnLaunch"] = json!(true);
                }
                stack.add_resource(&subnet_id, Resource::new("AWS::EC2::Subnet", properties));

                // Each subnet routes through its own table
                let table_id = format!("{subnet_id}RouteTable");
                stack.add_resource(
                    &table_id,
                    Resource::new(
                        "AWS::EC2::RouteTable",
                        json!({
                            "VpcId": template::reference(&vpc_id),
                            "Tags": [ { "Key": "Name", "Value": format!("{subnet_name}-rt") } ]
                        }),
                    ),
                );
                stack.add_resource(
                    format!("{subnet_id}RouteTableAssociation"),
                    Resource::new(
                        "AWS::EC2::SubnetRouteTableAssociation",
                        json!({
                            "SubnetId": template::reference(&subnet_id),
                            "RouteTableId": template::reference(&table_id)
                        }),
                    )
                    .untagged(),
                );

                match tier {
                    SubnetTier::Public => {
                        stack.add_resource(
                            format!("{subnet_id}DefaultRoute"),
                            Resource::new(
                                "AWS::EC2::Route",
                                json!({
                                    "RouteTableId": template::reference(&table_id),
                                    "DestinationCidrBlock": "0.0.0.0/0",
                                    "GatewayId": template::reference(&igw_id)
                                }),
                            )
                            .untagged()
                            .depends_on(&attachment_id),
                        );
                        public_subnets.push(subnet_id);
                    }
                    SubnetTier::Private => {
                        private_subnets.push(subnet_id);
                        private_route_tables.push(table_id);
                    }
                    SubnetTier::Isolated => {}
                }
            }
        }

        if self.cfg.enable_nat_gateway {
            self.add_nat_gateway(stack, &attachment_id, &public_subnets, &private_route_tables);
        }

        let web_sg_id = self.add_web_security_group(stack, &vpc_id);
        let db_sg_id = self.add_database_security_group(stack, &vpc_id, &web_sg_id);
        self.add_gateway_endpoints(stack, &vpc_id, &region, &private_route_tables);

        self.add_outputs(
            stack,
            &vpc_id,
            &public_subnets,
            &private_subnets,
            &web_sg_id,
            &db_sg_id,
        );

        info!(
            env = env,
            azs = self.cfg.max_azs,
            subnets = 3 * self.cfg.max_azs,
            "network declared"
        );

        Ok(())
    }

    fn add_nat_gateway(
        &self,
        stack: &mut Stack,
        attachment_id: &str,
        public_subnets: &[String],
        private_route_tables: &[String],
    ) {
        let Some(first_public) = public_subnets.first() else {
            return;
        };
        let env = self.env_name;

        let eip_id = logical_id(&format!("nat-eip-{env}"));
        stack.add_resource(
            &eip_id,
            Resource::new("AWS::EC2::EIP", json!({ "Domain": "vpc" }))
                .depends_on(attachment_id),
        );

        let nat_id = logical_id(&format!("nat-gateway-{env}"));
        stack.add_resource(
            &nat_id,
            Resource::new(
                "AWS::EC2::NatGateway",
                json!({
                    "SubnetId": template::reference(first_public),
                    "AllocationId": template::get_att(&eip_id, "AllocationId"),
                    "Tags": [ { "Key": "Name", "Value": format!("nat-gateway-{env}") } ]
                }),
            ),
        );

        // The private tier's route to the outside goes through the NAT
        for table_id in private_route_tables {
            stack.add_resource(
                format!("{table_id}DefaultRoute"),
                Resource::new(
                    "AWS::EC2::Route",
                    json!({
                        "RouteTableId": template::reference(table_id),
                        "DestinationCidrBlock": "0.0.0.0/0",
                        "NatGatewayId": template::reference(&nat_id)
                    }),
                )
                .untagged(),
            );
        }
    }

    fn add_web_security_group(&self, stack: &mut Stack, vpc_id: &str) -> String {
        let env = self.env_name;
        let web_sg_id = logical_id(&format!("web-security-group-{env}"));
        stack.add_resource(
            &web_sg_id,
            Resource::new(
                "AWS::EC2::SecurityGroup",
                json!({
                    "GroupDescription": format!("Security group for web services in {env}"),
                    "VpcId": template::reference(vpc_id),
                    "SecurityGroupEgress": [
                        {
                            "CidrIp": "0.0.0.0/0",
                            "IpProtocol": "-1",
                            "Description": "Allow all outbound traffic"
                        }
                    ],
                    "SecurityGroupIngress": [
                        {
                            "CidrIp": "0.0.0.0/0",
                            "IpProtocol": "tcp",
                            "FromPort": 80,
                            "ToPort": 80,
                            "Description": "Allow HTTP traffic"
                        },
                        {
                            "CidrIp": "0.0.0.0/0",
                            "IpProtocol": "tcp",
                            "FromPort": 443,
                            "ToPort": 443,
                            "Description": "Allow HTTPS traffic"
                        }
                    ]
                }),
            ),
        );
        web_sg_id
    }

    fn add_database_security_group(
        &self,
        stack: &mut Stack,
        vpc_id: &str,
        web_sg_id: &str,
    ) -> String {
        let env = self.env_name;
        let db_sg_id = logical_id(&format!("database-security-group-{env}"));

        // The unreachable egress rule is CloudFormation's marker for "no
        // outbound traffic": without any egress entry the default
        // allow-all rule would apply.
        stack.add_resource(
            &db_sg_id,
            Resource::new(
                "AWS::EC2::SecurityGroup",
                json!({
                    "GroupDescription": format!("Security group for database services in {env}"),
                    "VpcId": template::reference(vpc_id),
                    "SecurityGroupEgress": [
                        {
                            "CidrIp": "255.255.255.255/32",
                            "IpProtocol": "icmp",
                            "FromPort": 252,
                            "ToPort": 86,
                            "Description": "Disallow all traffic"
                        }
                    ],
                    "SecurityGroupIngress": [
                        {
                            "SourceSecurityGroupId": template::get_att(web_sg_id, "GroupId"),
                            "IpProtocol": "tcp",
                            "FromPort": 3306,
                            "ToPort": 3306,
                            "Description": "Allow MySQL access from web services"
                        },
                        {
                            "SourceSecurityGroupId": template::get_att(web_sg_id, "GroupId"),
                            "IpProtocol": "tcp",
                            "FromPort": 5432,
                            "ToPort": 5432,
                            "Description": "Allow PostgreSQL access from web services"
                        }
                    ]
                }),
            ),
        );
        db_sg_id
    }

    fn add_gateway_endpoints(
        &self,
        stack: &mut Stack,
        vpc_id: &str,
        region: &str,
        private_route_tables: &[String],
    ) {
        let route_table_refs: Vec<_> = private_route_tables
            .iter()
            .map(|id| template::reference(id))
            .collect();

        for (service, endpoint_id) in [("s3", "S3GatewayEndpoint"), ("dynamodb", "DynamoDbGatewayEndpoint")] {
            stack.add_resource(
                endpoint_id,
                Resource::new(
                    "AWS::EC2::VPCEndpoint",
                    json!({
                        "VpcId": template::reference(vpc_id),
                        "ServiceName": format!("com.amazonaws.{region}.{service}"),
                        "VpcEndpointType": "Gateway",
                        "RouteTableIds": route_table_refs
                    }),
                )
                .untagged(),
            );
        }
    }

    fn add_outputs(
        &self,
        stack: &mut Stack,
        vpc_id: &str,
        public_subnets: &[String],
        private_subnets: &[String],
        web_sg_id: &str,
        db_sg_id: &str,
    ) {
        let env = self.env_name;
        let join_ids = |ids: &[String]| {
            template::join(
                ",",
                ids.iter().map(|id| template::reference(id)).collect(),
            )
        };

        stack.add_output(
            logical_id(&format!("vpc-id-{env}")),
            Output::new(
                template::reference(vpc_id),
                format!("VPC ID for {env} environment"),
            ),
        );
        stack.add_output(
            logical_id(&format!("vpc-cidr-{env}")),
            Output::new(
                template::get_att(vpc_id, "CidrBlock"),
                format!("VPC CIDR block for {env} environment"),
            ),
        );
        stack.add_output(
            logical_id(&format!("public-subnet-ids-{env}")),
            Output::new(
                join_ids(public_subnets),
                format!("Public subnet IDs for {env} environment"),
            ),
        );
        stack.add_output(
            logical_id(&format!("private-subnet-ids-{env}")),
            Output::new(
                join_ids(private_subnets),
                format!("Private subnet IDs for {env} environment"),
            ),
        );
        stack.add_output(
            logical_id(&format!("web-security-group-id-{env}")),
            Output::new(
                template::get_att(web_sg_id, "GroupId"),
                format!("Web security group ID for {env} environment"),
            ),
        );
        stack.add_output(
            logical_id(&format!("database-security-group-id-{env}")),
            Output::new(
                template::get_att(db_sg_id, "GroupId"),
                format!("Database security group ID for {env} environment"),
            ),
        );
    }
}
