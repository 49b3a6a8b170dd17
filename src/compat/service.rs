//! Service comparison with asymmetric request/response rules.

use super::shape::compare_keyed;
use super::{Compatibility, Comparison};
use crate::descriptor::{MethodNode, ServiceId};
use crate::error::Result;
use tracing::trace;

impl<'a> Comparison<'a> {
    /// Compares two services method-by-method, keyed by method name.
    pub fn compare_service(
        &mut self,
        consumer: ServiceId,
        producer: ServiceId,
    ) -> Result<Compatibility> {
        let (consumer_tree, producer_tree) = (self.consumer.tree, self.producer.tree);
        let consumer_svc = consumer_tree.service(consumer);
        let producer_svc = producer_tree.service(producer);

        compare_keyed(
            "method",
            &consumer_svc.methods,
            &producer_svc.methods,
            |method| method.name.as_str(),
            |consumer_method, producer_method| {
                self.compare_method(consumer_method, producer_method)
            },
        )
    }

    /// The consumer builds the request, so its shape must be exactly what the
    /// producer accepts: anything but `Equal` is `NotCompatible`. Response
    /// shapes may evolve, so their verdict passes through unchanged. A change
    /// between unary and streaming on either side is `NotCompatible`.
    fn compare_method(
        &mut self,
        consumer: &MethodNode,
        producer: &MethodNode,
    ) -> Result<Compatibility> {
        let (consumer_side, producer_side) = (self.consumer, self.producer);

        let consumer_request = consumer_side.message(&consumer.input_type)?;
        let producer_request = producer_side.message(&producer.input_type)?;
        let consumer_response = consumer_side.message(&consumer.output_type)?;
        let producer_response = producer_side.message(&producer.output_type)?;

        if consumer.client_streaming != producer.client_streaming
            || consumer.server_streaming != producer.server_streaming
        {
            trace!(method = %consumer.name, "Streaming mode differs");
            return Ok(Compatibility::NotCompatible);
        }

        let request = match self.compare_message(consumer_request, producer_request)? {
            Compatibility::Equal => Compatibility::Equal,
            verdict => {
                trace!(method = %consumer.name, %verdict, "Request shapes differ");
                return Ok(Compatibility::NotCompatible);
            }
        };
        let response = self.compare_message(consumer_response, producer_response)?;

        Ok(Compatibility::aggregate([request, response]))
    }
}
